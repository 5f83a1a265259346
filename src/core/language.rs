//! Language detection by file extension

use std::path::Path;

/// Source language, as far as tag handling cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Python,
    /// `#` line comments (shell, ruby, julia, ...)
    Hash,
    /// `//` line comments (C family, JS, Go, Rust, ...)
    Slash,
    /// `%` line comments (TeX, MATLAB)
    Percent,
    /// `<!--` comments (HTML, XML, Markdown)
    Markup,
    /// `--` line comments (SQL, Lua, Haskell)
    DoubleDash,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("py") => Language::Python,
            Some("sh" | "bash" | "zsh" | "csh" | "ruby" | "rb" | "jl" | "r" | "pl" | "yaml"
            | "yml" | "toml") => Language::Hash,
            Some("c" | "cpp" | "cc" | "h" | "hpp" | "cs" | "java" | "js" | "ts" | "go" | "rs"
            | "swift" | "kt" | "scala") => Language::Slash,
            Some("tex" | "m") => Language::Percent,
            Some("html" | "xml" | "md") => Language::Markup,
            Some("sql" | "lua" | "hs") => Language::DoubleDash,
            _ => Language::Unknown,
        }
    }

    /// Marker that starts a trailing comment, if known
    pub fn comment_marker(&self) -> Option<&'static str> {
        match self {
            Language::Python | Language::Hash => Some("#"),
            Language::Slash => Some("//"),
            Language::Percent => Some("%"),
            Language::Markup => Some("<!--"),
            Language::DoubleDash => Some("--"),
            Language::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection() {
        assert_eq!(Language::from_path(Path::new("a.py")), Language::Python);
        assert_eq!(Language::from_path(Path::new("a.PY")), Language::Python);
        assert_eq!(Language::from_path(Path::new("a.sh")), Language::Hash);
        assert_eq!(Language::from_path(Path::new("a.jl")), Language::Hash);
        assert_eq!(Language::from_path(Path::new("a.cpp")), Language::Slash);
        assert_eq!(Language::from_path(Path::new("a.tex")), Language::Percent);
        assert_eq!(Language::from_path(Path::new("a.html")), Language::Markup);
        assert_eq!(Language::from_path(Path::new("a.sql")), Language::DoubleDash);
        assert_eq!(Language::from_path(Path::new("a.xyz")), Language::Unknown);
        assert_eq!(Language::from_path(Path::new("Makefile")), Language::Unknown);
    }

    #[test]
    fn test_comment_markers() {
        assert_eq!(Language::Python.comment_marker(), Some("#"));
        assert_eq!(Language::Slash.comment_marker(), Some("//"));
        assert_eq!(Language::Percent.comment_marker(), Some("%"));
        assert_eq!(Language::Markup.comment_marker(), Some("<!--"));
        assert_eq!(Language::Unknown.comment_marker(), None);
    }
}
