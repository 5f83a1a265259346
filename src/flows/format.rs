//! Format flow - build the tag registry, then resolve every document
//!
//! The build phase is all-or-nothing. Documents are independent: a document
//! that fails loses its output, the rest are still processed, and the run
//! fails at the end if any document did.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use crate::backends::scan::ref_files;
use crate::core::config::ProjectConfig;
use crate::core::error::Result as RefersResult;
use crate::core::model::{ItemError, ResultItem, ResultSet};
use crate::core::paths::{make_relative, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::refs::view::ViewResolver;
use crate::refs::writer::{write_document, DocumentStatus};
use crate::tags::api::build_project;

/// Counts over one format run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormatSummary {
    pub tags: usize,
    pub written: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub references: usize,
    pub warnings: usize,
}

impl FormatSummary {
    pub fn documents(&self) -> usize {
        self.written + self.removed + self.skipped + self.failed
    }
}

/// Build the registry and write the output of every documentation file
pub fn format_project(config: &ProjectConfig) -> RefersResult<(ResultSet, FormatSummary)> {
    let build = build_project(config)?;
    if build.registry.is_empty() {
        tracing::warn!(root = %config.root.display(), "no tags found");
    }
    let resolver = ViewResolver::new(&build.registry, &config.root, config.allow_not_found_tags);

    let mut summary = FormatSummary {
        tags: build.registry.len(),
        warnings: build.warnings.len(),
        ..Default::default()
    };
    let mut result_set = ResultSet::new();

    for doc in ref_files(config) {
        let item = ResultItem::document(display_path(&doc, &config.root));

        let item = match write_document(&doc, &resolver) {
            Ok(report) => {
                match report.status {
                    DocumentStatus::Written => summary.written += 1,
                    DocumentStatus::Removed => summary.removed += 1,
                    DocumentStatus::Skipped => summary.skipped += 1,
                }
                summary.references += report.references;
                summary.warnings += report.warnings.len();

                item.with_data(serde_json::json!({
                    "status": report.status,
                    "output": display_path(&report.output, &config.root),
                    "references": report.references,
                }))
                .with_warnings(&report.warnings)
            }
            Err(err) => {
                tracing::error!(code = err.code(), "{err}");
                summary.failed += 1;
                item.with_data(serde_json::json!({ "status": "failed" }))
                    .with_error(ItemError::from(&err))
            }
        };
        result_set.push(item);
    }

    result_set.sort();
    Ok((result_set, summary))
}

/// Run format command
pub fn run_format(config: &ProjectConfig, render: RenderConfig, quiet: bool) -> Result<()> {
    let renderer = Renderer::with_config(render);

    let (result_set, summary) = match format_project(config) {
        Ok(done) => done,
        Err(err) => {
            let failed: ResultSet =
                std::iter::once(ResultItem::error(ItemError::from(&err))).collect();
            println!("{}", renderer.render(&failed));
            return Err(err.into());
        }
    };
    if result_set.is_empty() {
        tracing::warn!(root = %config.root.display(), "no documentation files found");
    }

    println!("{}", renderer.render(&result_set));

    if !quiet {
        print_summary(&summary);
    }

    if summary.failed > 0 {
        bail!(
            "{} of {} documents failed",
            summary.failed,
            summary.documents()
        );
    }
    Ok(())
}

fn print_summary(summary: &FormatSummary) {
    let head = format!(
        "{} tags, {} references in {} documents: {} written, {} removed, {} skipped",
        summary.tags,
        summary.references,
        summary.documents(),
        summary.written,
        summary.removed,
        summary.skipped
    );
    if summary.failed > 0 {
        let failed = format!("{} failed", summary.failed);
        eprintln!("{}, {}", head.yellow(), failed.red().bold());
    } else {
        eprintln!("{}", head.green());
    }
    if summary.warnings > 0 {
        eprintln!("{}", format!("{} warnings", summary.warnings).yellow());
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    make_relative(path, root).unwrap_or_else(|| normalize_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Settings;
    use std::fs;
    use tempfile::tempdir;

    fn project(files: &[(&str, &str)]) -> (tempfile::TempDir, ProjectConfig) {
        let temp = tempdir().unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let settings = Settings {
            ref_extensions: Some(vec![".md".to_string()]),
            ..Default::default()
        };
        let config = ProjectConfig::from_settings(temp.path().to_path_buf(), settings);
        (temp, config)
    }

    #[test]
    fn test_format_isolates_failing_documents() {
        let (temp, config) = project(&[
            ("src/test.py", "# Test file\na = 1  # @tag:a\n"),
            ("docs/good.md", "line @ref:a:line\n"),
            ("docs/bad.md", "missing @ref:c\n"),
            ("docs/plain.md", "nothing here\n"),
        ]);

        let (result_set, summary) = format_project(&config).unwrap();
        assert_eq!(summary.tags, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.documents(), 3);
        assert_eq!(result_set.len(), 3);

        let good = fs::read_to_string(temp.path().join("docs/good_refers.md")).unwrap();
        assert_eq!(good, "line 2\n");
        assert!(!temp.path().join("docs/bad_refers.md").exists());

        let bad = result_set
            .items
            .iter()
            .find(|i| i.path.as_deref() == Some("docs/bad.md"))
            .unwrap();
        assert_eq!(bad.errors[0].code, "TAG_NOT_FOUND");
        assert_eq!(bad.data.as_ref().unwrap()["status"], "failed");
    }

    #[test]
    fn test_format_build_errors_are_fatal() {
        let (temp, config) = project(&[
            ("a.py", "a = 1  # @tag:a\n"),
            ("b.py", "b = 1  # @tag:a\n"),
            ("doc.md", "@ref:a\n"),
        ]);

        let err = format_project(&config).unwrap_err();
        assert!(err.to_string().contains("Tag a is not unique"));
        assert!(!temp.path().join("doc_refers.md").exists());
    }

    #[test]
    fn test_rerun_does_not_read_outputs() {
        let (_temp, config) = project(&[
            ("a.py", "a = 1  # @tag:a\n"),
            ("doc.md", "@ref:a:file\n"),
        ]);

        let (_, first) = format_project(&config).unwrap();
        let (_, second) = format_project(&config).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.documents(), 1);
    }
}
