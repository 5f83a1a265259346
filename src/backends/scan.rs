//! File enumeration backend
//!
//! Uses the ignore crate for traversal, then filters by extension and by the
//! configured ignore/search directories.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::core::config::ProjectConfig;
use crate::core::paths::is_output_artifact;

/// Which files a scan keeps
#[derive(Debug, Clone)]
pub struct ScanFilter<'a> {
    /// Lowercase extensions without the leading dot
    pub extensions: &'a [String],
    pub dirs2ignore: &'a [PathBuf],
    pub dirs2search: Option<&'a [PathBuf]>,
    pub respect_gitignore: bool,
}

impl ScanFilter<'_> {
    fn accepts(&self, path: &Path) -> bool {
        let ext_ok = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false);
        if !ext_ok || is_output_artifact(path) {
            return false;
        }

        if self.dirs2ignore.iter().any(|dir| path.starts_with(dir)) {
            return false;
        }

        match self.dirs2search {
            Some(dirs) => dirs.iter().any(|dir| path.starts_with(dir)),
            None => true,
        }
    }
}

/// Scan files under `root`, sorted for stable processing order
pub fn scan_files(root: &Path, filter: &ScanFilter) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(filter.respect_gitignore)
        .git_global(filter.respect_gitignore)
        .git_exclude(filter.respect_gitignore);

    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if filter.accepts(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files
}

/// Files to scan for tags: the explicit list when configured, else a walk
pub fn tag_files(config: &ProjectConfig) -> Vec<PathBuf> {
    match &config.tag_files {
        Some(files) => files.clone(),
        None => scan_files(
            &config.root,
            &ScanFilter {
                extensions: &config.tag_extensions,
                dirs2ignore: &config.dirs2ignore,
                dirs2search: config.dirs2search.as_deref(),
                respect_gitignore: config.respect_gitignore,
            },
        ),
    }
}

/// Documentation files to resolve references in
pub fn ref_files(config: &ProjectConfig) -> Vec<PathBuf> {
    match &config.ref_files {
        Some(files) => files.clone(),
        None => scan_files(
            &config.root,
            &ScanFilter {
                extensions: &config.ref_extensions,
                dirs2ignore: &config.dirs2ignore,
                dirs2search: config.dirs2search.as_deref(),
                respect_gitignore: config.respect_gitignore,
            },
        ),
    }
}
