//! Tag records and the registry that owns them

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::error::{RefersError, Result, Site};
use crate::segment::LogicalLine;

/// A named tag declared by a `@tag:<name>` comment
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    name: String,
    file: PathBuf,
    line: usize,
    line_text: String,
    logical_start: usize,
    logical_end: usize,
    logical_text: String,
    function: Option<String>,
    class: Option<String>,
}

impl Tag {
    /// A tag as seen by the single-line scan: its logical statement is its own line
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>, line: usize, text: &str) -> Self {
        let text = text.trim().to_string();
        Self {
            name: name.into(),
            file: file.into(),
            line,
            line_text: text.clone(),
            logical_start: line,
            logical_end: line,
            logical_text: text,
            function: None,
            class: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File that declares the tag
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Physical line of the tag comment (1-based)
    pub fn line(&self) -> usize {
        self.line
    }

    /// Trimmed text of the physical line
    pub fn line_text(&self) -> &str {
        &self.line_text
    }

    pub fn logical_start(&self) -> usize {
        self.logical_start
    }

    pub fn logical_end(&self) -> usize {
        self.logical_end
    }

    /// Full text of the statement the tag belongs to
    pub fn logical_text(&self) -> &str {
        &self.logical_text
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn site(&self) -> Site {
        Site::new(self.file.clone(), self.line)
    }

    fn refine(&mut self, unit: &LogicalLine) {
        self.logical_start = unit.start;
        self.logical_end = unit.end;
        self.logical_text = unit.text.clone();
        self.function = unit.function.clone();
        self.class = unit.class.clone();
    }
}

/// Name -> tag mapping; names are unique across the whole run
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: HashMap<String, Tag>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tag; a second tag with the same name is fatal
    pub fn insert(&mut self, tag: Tag) -> Result<()> {
        if let Some(existing) = self.tags.get(tag.name()) {
            return Err(RefersError::TagAlreadyExists {
                name: tag.name.clone(),
                first: existing.site(),
                second: tag.site(),
            });
        }
        self.tags.insert(tag.name.clone(), tag);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Tag> {
        self.tags.get(name).ok_or_else(|| RefersError::TagNotFound {
            name: name.to_string(),
            site: None,
        })
    }

    /// Overwrite the logical span, text and scopes of an already registered tag.
    ///
    /// The tag must have been registered from `file` on a line inside `unit`.
    /// Identity (name, file, physical line) never changes.
    pub fn refine(&mut self, name: &str, file: &Path, unit: &LogicalLine) -> Result<()> {
        let inconsistent = || RefersError::InconsistentSegment {
            name: name.to_string(),
            path: file.to_path_buf(),
            start: unit.start,
            end: unit.end,
        };

        let tag = self.tags.get_mut(name).ok_or_else(inconsistent)?;
        if tag.file.as_path() != file || tag.line < unit.start || tag.line > unit.end {
            return Err(inconsistent());
        }
        tag.refine(unit);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Tags ordered by file then line
    pub fn sorted(&self) -> Vec<&Tag> {
        let mut tags: Vec<&Tag> = self.tags.values().collect();
        tags.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        tags
    }
}
