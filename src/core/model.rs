//! Unified Result Model
//!
//! Commands map tags, documents and failures to this model before rendering.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::RefersError;
use crate::core::paths::normalize_path;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Tag,
    Document,
    Option,
    Error,
}

/// Line-based range (1-based, inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLine {
    pub start: u32,
    pub end: u32,
}

impl RangeLine {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&RefersError> for ItemError {
    fn from(err: &RefersError) -> Self {
        ItemError::new(err.code(), err.to_string())
    }
}

/// Warning codes for recoverable conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    /// Segmenter could not parse a source; its tags keep line fidelity only
    UnparsableSource,
    /// `quotecode` on an extension without a comment marker
    UnknownCommentMarker,
    /// `func`/`class` requested for a tag outside any function/class
    MissingScope,
    /// `p`-option deeper than the file's directory chain
    AncestorOutOfRange,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::UnparsableSource => "UNPARSABLE_SOURCE",
            WarningCode::UnknownCommentMarker => "UNKNOWN_COMMENT_MARKER",
            WarningCode::MissingScope => "MISSING_SCOPE",
            WarningCode::AncestorOutOfRange => "ANCESTOR_OUT_OF_RANGE",
        }
    }
}

/// A structured warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: WarningCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Warning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// Emit through the log and hand the warning back for collection
    pub fn logged(self) -> Self {
        match &self.path {
            Some(path) => tracing::warn!(
                code = self.code.as_str(),
                path = %normalize_path(path),
                "{}",
                self.message
            ),
            None => tracing::warn!(code = self.code.as_str(), "{}", self.message),
        }
        self
    }
}

impl From<&Warning> for ItemError {
    fn from(warning: &Warning) -> Self {
        ItemError::new(warning.code.as_str(), warning.message.clone())
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeLine>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Structured payload (tag metadata, document status, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ItemError>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            path: None,
            range: None,
            excerpt: None,
            data: None,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a new tag result
    pub fn tag(path: impl Into<String>, range: RangeLine) -> Self {
        Self {
            path: Some(path.into()),
            range: Some(range),
            ..Self::empty(Kind::Tag)
        }
    }

    /// Create a new document result
    pub fn document(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::empty(Kind::Document)
        }
    }

    /// Create a new option listing entry
    pub fn option(name: &str, description: &str) -> Self {
        Self {
            excerpt: Some(description.to_string()),
            data: Some(serde_json::json!({ "name": name })),
            ..Self::empty(Kind::Option)
        }
    }

    /// Create a new error result
    pub fn error(error: ItemError) -> Self {
        Self {
            errors: vec![error],
            ..Self::empty(Kind::Error)
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_warnings<'a>(mut self, warnings: impl IntoIterator<Item = &'a Warning>) -> Self {
        self.warnings.extend(warnings.into_iter().map(ItemError::from));
        self
    }

    pub fn with_error(mut self, error: ItemError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path and range start for stable output
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb).then_with(|| match (&a.range, &b.range) {
                (Some(ra), Some(rb)) => ra.start.cmp(&rb.start),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
