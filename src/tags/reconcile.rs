//! Structural refinement of scanned tags
//!
//! Runs after the single-line scan of a file has registered its tags. Every
//! logical line the segmenter produces is re-matched against the tag pattern
//! and each tag it mentions takes over the statement's span, text and scopes.

use std::path::Path;

use crate::core::error::Result;
use crate::core::model::{Warning, WarningCode};
use crate::segment::Segmenter;
use crate::tags::registry::TagRegistry;
use crate::tags::scan::tag_names;

/// Refine the tags of `path` from its logical lines.
///
/// A source the segmenter cannot parse is not an error: its tags keep
/// single-line fidelity and a warning is returned instead.
pub fn reconcile(
    registry: &mut TagRegistry,
    path: &Path,
    content: &str,
    segmenter: &dyn Segmenter,
) -> Result<Option<Warning>> {
    let units = match segmenter.segment(content) {
        Ok(units) => units,
        Err(err) => {
            let warning = Warning::new(
                WarningCode::UnparsableSource,
                format!("Cannot segment source ({err}); tags keep their single line"),
            )
            .with_path(path)
            .logged();
            return Ok(Some(warning));
        }
    };

    let mut refined = 0usize;
    for unit in &units {
        for name in tag_names(&unit.text) {
            registry.refine(name, path, unit)?;
            refined += 1;
        }
    }

    tracing::debug!(path = %path.display(), units = units.len(), refined, "reconciled tags");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RefersError;
    use crate::segment::python::PythonSegmenter;
    use crate::segment::{LogicalLine, SegmentError};
    use crate::tags::scan::scan_content;

    fn build(path: &Path, content: &str) -> (TagRegistry, Option<Warning>) {
        let mut registry = TagRegistry::new();
        for tag in scan_content(path, content).unwrap() {
            registry.insert(tag).unwrap();
        }
        let warning = reconcile(&mut registry, path, content, &PythonSegmenter).unwrap();
        (registry, warning)
    }

    const HARD_CASES: &str = "\
# Test file
a = 1  # note before tag @tag:a note after tag
b =  1 # @tag:b note after tag
# standalone comment
c = 1
d =1  # note before tag @tag:d
e = ( # @tag:fe
1 # note whitespace after  @tag:e
)#note whitespace after tag@tag:ef
# standalone comment
f = (
1 # comment
# standalone comment
)  # @tag:f
# standalone comment
f=1

def f():
    a = 1  # @tag:aa
    return a


class F():
    a = 1  # @tag:bb
";

    #[test]
    fn test_single_line_tags_unchanged() {
        let path = Path::new("test.py");
        let (registry, warning) = build(path, HARD_CASES);
        assert!(warning.is_none());

        let a = registry.lookup("a").unwrap();
        assert_eq!(a.line(), 2);
        assert_eq!(a.line_text(), "a = 1  # note before tag @tag:a note after tag");
        assert_eq!(a.logical_text(), a.line_text());
        assert_eq!((a.logical_start(), a.logical_end()), (2, 2));

        let d = registry.lookup("d").unwrap();
        assert_eq!(d.logical_text(), "d =1  # note before tag @tag:d");
    }

    #[test]
    fn test_multiline_statement_same_for_every_tag() {
        let path = Path::new("test.py");
        let (registry, _) = build(path, HARD_CASES);
        let expected = "e = ( # @tag:fe\n1 # note whitespace after  @tag:e\n)#note whitespace after tag@tag:ef";

        for (name, line) in [("fe", 7), ("e", 8), ("ef", 9)] {
            let tag = registry.lookup(name).unwrap();
            assert_eq!(tag.line(), line, "{name}");
            assert_eq!((tag.logical_start(), tag.logical_end()), (7, 9), "{name}");
            assert_eq!(tag.logical_text(), expected, "{name}");
        }
        assert_eq!(registry.lookup("e").unwrap().line_text(), "1 # note whitespace after  @tag:e");
    }

    #[test]
    fn test_tag_on_closing_line_with_standalone_comments() {
        let (registry, _) = build(Path::new("test.py"), HARD_CASES);
        let f = registry.lookup("f").unwrap();
        assert_eq!(f.line(), 14);
        assert_eq!((f.logical_start(), f.logical_end()), (11, 14));
        assert_eq!(
            f.logical_text(),
            "f = (\n1 # comment\n# standalone comment\n)  # @tag:f"
        );
    }

    #[test]
    fn test_scopes_assigned() {
        let (registry, _) = build(Path::new("test.py"), HARD_CASES);

        let aa = registry.lookup("aa").unwrap();
        assert_eq!(aa.line(), 19);
        assert_eq!(aa.logical_text(), "a = 1  # @tag:aa");
        assert_eq!(aa.function(), Some("f"));
        assert_eq!(aa.class(), None);

        let bb = registry.lookup("bb").unwrap();
        assert_eq!(bb.line(), 24);
        assert_eq!(bb.function(), None);
        assert_eq!(bb.class(), Some("F"));
    }

    #[test]
    fn test_unparsable_source_degrades() {
        let path = Path::new("broken.py");
        let content = "a = 1  # @tag:a\nb = (  # @tag:b\n";
        let (registry, warning) = build(path, content);

        let warning = warning.unwrap();
        assert_eq!(warning.code, WarningCode::UnparsableSource);
        assert_eq!(warning.path.as_deref(), Some(path));

        let b = registry.lookup("b").unwrap();
        assert_eq!(b.logical_text(), "b = (  # @tag:b");
        assert_eq!((b.logical_start(), b.logical_end()), (2, 2));
    }

    struct Diverging;

    impl Segmenter for Diverging {
        fn segment(&self, _source: &str) -> std::result::Result<Vec<LogicalLine>, SegmentError> {
            Ok(vec![LogicalLine {
                text: "x = 1  # @tag:ghost".to_string(),
                start: 1,
                end: 1,
                function: None,
                class: None,
            }])
        }
    }

    #[test]
    fn test_divergence_is_reported() {
        let path = Path::new("t.py");
        let mut registry = TagRegistry::new();
        let err = reconcile(&mut registry, path, "x = 1\n", &Diverging).unwrap_err();
        assert!(matches!(err, RefersError::InconsistentSegment { ref name, .. } if name == "ghost"));
    }
}
