//! Single-line tag scan
//!
//! Every physical line is matched against the tag pattern on its own. This is
//! the only pass for files without a segmenter, and it is what catches
//! duplicate and ambiguous declarations before any structural work happens.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::core::error::{RefersError, Result};
use crate::tags::registry::Tag;

/// `@tag:<name>`, independent of the host file's comment syntax
pub static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@tag:([\w\-]+)").expect("Invalid TAG_RE regex"));

/// Names of all tags mentioned in `text`, in order of appearance
pub fn tag_names(text: &str) -> impl Iterator<Item = &str> {
    TAG_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Scan `content` of `path` line by line.
///
/// Lines without a tag are skipped; a line with more than one tag is fatal.
pub fn scan_content(path: &Path, content: &str) -> Result<Vec<Tag>> {
    let mut tags = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let mut names = tag_names(line);

        let Some(name) = names.next() else {
            continue;
        };
        if names.next().is_some() {
            return Err(RefersError::MultipleTagsOnLine {
                path: path.to_path_buf(),
                line: line_num,
            });
        }

        tags.push(Tag::new(name, path, line_num, line));
    }

    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_tags() {
        let content = "# Test file\na = 1  # @tag:a\nb = 1  # @tag:b\nc = 1\n";
        let tags = scan_content(Path::new("test.py"), content).unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name(), "a");
        assert_eq!(tags[0].line(), 2);
        assert_eq!(tags[0].line_text(), "a = 1  # @tag:a");
        assert_eq!(tags[1].name(), "b");
        assert_eq!(tags[1].line(), 3);
    }

    #[test]
    fn test_scan_ignores_comment_syntax() {
        let content = "x = 1  // @tag:slash\n<!-- @tag:markup -->\n% @tag:tex\n";
        let names: Vec<String> = scan_content(Path::new("f.txt"), content)
            .unwrap()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["slash", "markup", "tex"]);
    }

    #[test]
    fn test_scan_text_around_tag() {
        let content = "a = 1  # note before tag @tag:a note after tag\n";
        let tags = scan_content(Path::new("t.py"), content).unwrap();
        assert_eq!(tags[0].name(), "a");
        assert_eq!(
            tags[0].line_text(),
            "a = 1  # note before tag @tag:a note after tag"
        );
    }

    #[test]
    fn test_scan_name_stops_at_colon() {
        let tags = scan_content(Path::new("t.md"), "see @tag:f_a:link\n").unwrap();
        assert_eq!(tags[0].name(), "f_a");
    }

    #[test]
    fn test_scan_multiple_tags_on_line() {
        let content = "# Test file\n\nFunction `f`: @tag:f_a:link and @tag:f_b:pp and @tag:f_c\n";
        let err = scan_content(Path::new("test.md"), content).unwrap_err();
        match err {
            RefersError::MultipleTagsOnLine { path, line } => {
                assert_eq!(path, Path::new("test.md"));
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tag_names_order() {
        let names: Vec<&str> = tag_names("( # @tag:fe\n1 # @tag:e\n)#@tag:ef").collect();
        assert_eq!(names, vec!["fe", "e", "ef"]);
    }
}
