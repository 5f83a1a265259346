//! Error taxonomy
//!
//! Fatal conditions are `RefersError` variants. Recoverable conditions are
//! [`Warning`](crate::core::model::Warning) values and never travel through here.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::paths::normalize_path;

/// A location in a file (1-based line)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub path: PathBuf,
    pub line: usize,
}

impl Site {
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", normalize_path(&self.path), self.line)
    }
}

fn referenced_at(site: &Option<Site>) -> String {
    site.as_ref()
        .map(|s| format!(" (referenced at {})", s))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum RefersError {
    #[error("File {} has multiple tags on line {line}", normalize_path(.path))]
    MultipleTagsOnLine { path: PathBuf, line: usize },

    #[error("Tag {name} is not unique: declared at {first} and again at {second}")]
    TagAlreadyExists {
        name: String,
        first: Site,
        second: Site,
    },

    #[error("Tag {name} not found{}", referenced_at(.site))]
    TagNotFound { name: String, site: Option<Site> },

    #[error("Option {option} of tag {name} not found{}. Possible options: {known}", referenced_at(.site))]
    OptionNotFound {
        option: String,
        name: String,
        site: Option<Site>,
        known: String,
    },

    /// The segmenter produced a tag the physical scan never saw (or saw elsewhere)
    #[error(
        "Segmented line {start}-{end} of {} mentions tag {name}, which the line scan did not register there",
        normalize_path(.path)
    )]
    InconsistentSegment {
        name: String,
        path: PathBuf,
        start: usize,
        end: usize,
    },

    #[error("Failed to read {}", normalize_path(.path))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", normalize_path(.path))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings in {}", normalize_path(.path))]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "Could not find refers.toml or pyproject.toml in {} or any parent directory",
        normalize_path(.start)
    )]
    ProjectRootNotFound { start: PathBuf },
}

impl RefersError {
    /// Stable code used in rendered result items
    pub fn code(&self) -> &'static str {
        match self {
            RefersError::MultipleTagsOnLine { .. } => "MULTIPLE_TAGS_ON_LINE",
            RefersError::TagAlreadyExists { .. } => "TAG_ALREADY_EXISTS",
            RefersError::TagNotFound { .. } => "TAG_NOT_FOUND",
            RefersError::OptionNotFound { .. } => "OPTION_NOT_FOUND",
            RefersError::InconsistentSegment { .. } => "INCONSISTENT_SEGMENT",
            RefersError::Read { .. } => "READ_FAILED",
            RefersError::Write { .. } => "WRITE_FAILED",
            RefersError::Config { .. } => "INVALID_SETTINGS",
            RefersError::ProjectRootNotFound { .. } => "PROJECT_ROOT_NOT_FOUND",
        }
    }

    /// Attach the referencing site to a lookup/option failure
    pub fn at(self, at: Site) -> Self {
        match self {
            RefersError::TagNotFound { name, .. } => RefersError::TagNotFound {
                name,
                site: Some(at),
            },
            RefersError::OptionNotFound {
                option,
                name,
                known,
                ..
            } => RefersError::OptionNotFound {
                option,
                name,
                site: Some(at),
                known,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, RefersError>;
