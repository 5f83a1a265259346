//! Path normalization utilities
//!
//! Every path that ends up in generated documentation uses '/' as separator.

use std::path::{Component, Path, PathBuf};

/// Marker inserted between a document's stem and its extension in the output name
pub const OUTPUT_SUFFIX: &str = "_refers";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// File name of `path`, or an empty string for paths that have none
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Path of `path` relative to its `levels`-th parent directory.
///
/// `levels == 0` yields the bare file name, `levels == 1` prefixes the
/// directory that contains the file, and so on. Returns `None` when the path
/// has fewer directories than requested.
pub fn ancestor_relative(path: &Path, levels: usize) -> Option<String> {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    // The last part is the file itself
    if levels + 1 > parts.len() {
        return None;
    }
    Some(parts[parts.len() - levels - 1..].join("/"))
}

/// Every normal path component joined with '/', without any root or prefix
pub fn strip_root(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Sibling output path for a documentation file: `x.ext` -> `x_refers.ext`
pub fn output_path(doc: &Path) -> PathBuf {
    let stem = doc
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match doc.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    doc.with_file_name(name)
}

/// Whether `path` is an artifact produced by [`output_path`]
pub fn is_output_artifact(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(OUTPUT_SUFFIX))
        .unwrap_or(false)
}

/// Resolve `path` against `root` unless it is already absolute
pub fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        let path = Path::new("src/main.py");
        assert_eq!(normalize_path(path), "src/main.py");
    }

    #[test]
    fn test_make_relative() {
        let root = Path::new("/project");
        let path = Path::new("/project/src/main.py");
        assert_eq!(make_relative(path, root), Some("src/main.py".to_string()));
    }

    #[test]
    fn test_make_relative_not_under_root() {
        let root = Path::new("/project");
        let path = Path::new("/other/file.py");
        assert_eq!(make_relative(path, root), None);
    }

    #[test]
    fn test_ancestor_relative_levels() {
        let path = Path::new("/a/b/c/f.py");
        assert_eq!(ancestor_relative(path, 0).as_deref(), Some("f.py"));
        assert_eq!(ancestor_relative(path, 1).as_deref(), Some("c/f.py"));
        assert_eq!(ancestor_relative(path, 2).as_deref(), Some("b/c/f.py"));
        assert_eq!(ancestor_relative(path, 3).as_deref(), Some("a/b/c/f.py"));
        assert_eq!(ancestor_relative(path, 4), None);
    }

    #[test]
    fn test_strip_root() {
        assert_eq!(strip_root(Path::new("/a/b/f.py")), "a/b/f.py");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("/docs/readme.md")),
            PathBuf::from("/docs/readme_refers.md")
        );
        assert_eq!(
            output_path(Path::new("notes")),
            PathBuf::from("notes_refers")
        );
    }

    #[test]
    fn test_is_output_artifact() {
        assert!(is_output_artifact(Path::new("docs/readme_refers.md")));
        assert!(!is_output_artifact(Path::new("docs/readme.md")));
        assert!(!is_output_artifact(Path::new("docs/refers.md")));
    }

    #[test]
    fn test_resolve_against() {
        let root = Path::new("/project");
        assert_eq!(
            resolve_against(root, Path::new("docs")),
            PathBuf::from("/project/docs")
        );
        assert_eq!(
            resolve_against(root, Path::new("/abs")),
            PathBuf::from("/abs")
        );
    }
}
