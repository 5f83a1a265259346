//! Tag API - build the registry, list tags

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::backends::scan::tag_files;
use crate::core::config::ProjectConfig;
use crate::core::error::Result as RefersResult;
use crate::core::file_reader::read_text;
use crate::core::language::Language;
use crate::core::model::{ItemError, RangeLine, ResultItem, ResultSet, Warning};
use crate::core::paths::{make_relative, normalize_path};
use crate::core::render::{RenderConfig, Renderer};
use crate::segment::segmenter_for;
use crate::tags::reconcile::reconcile;
use crate::tags::registry::{Tag, TagRegistry};
use crate::tags::scan::scan_content;

/// Outcome of the build phase
#[derive(Debug, Default)]
pub struct BuildReport {
    pub registry: TagRegistry,
    /// Recoverable problems met while refining tags
    pub warnings: Vec<Warning>,
    pub files_scanned: usize,
}

/// Build the tag registry from `paths`.
///
/// Each file is scanned line by line and its tags registered before its
/// logical lines are reconciled. Any error aborts the whole build.
pub fn build_registry(paths: &[PathBuf]) -> RefersResult<BuildReport> {
    let mut report = BuildReport::default();

    for path in paths {
        let content = read_text(path)?;
        let tags = scan_content(path, &content)?;
        report.files_scanned += 1;
        if tags.is_empty() {
            continue;
        }

        tracing::debug!(path = %path.display(), count = tags.len(), "found tags");
        for tag in tags {
            report.registry.insert(tag)?;
        }

        if let Some(segmenter) = segmenter_for(Language::from_path(path)) {
            let warning = reconcile(&mut report.registry, path, &content, segmenter.as_ref())?;
            report.warnings.extend(warning);
        }
    }

    tracing::info!(
        files = report.files_scanned,
        tags = report.registry.len(),
        "tag registry built"
    );
    Ok(report)
}

/// Build the registry for a project
pub fn build_project(config: &ProjectConfig) -> RefersResult<BuildReport> {
    build_registry(&tag_files(config))
}

/// List the tags of a project, optionally only the one named `name`.
///
/// Naming a tag that does not exist is an error.
pub fn list_tags(config: &ProjectConfig, name: Option<&str>) -> RefersResult<ResultSet> {
    let report = build_project(config)?;
    if let Some(name) = name {
        report.registry.lookup(name)?;
    }
    let mut result_set = ResultSet::new();

    for tag in report.registry.sorted() {
        if name.is_some_and(|n| n != tag.name()) {
            continue;
        }
        let warnings = report
            .warnings
            .iter()
            .filter(|w| w.path.as_deref() == Some(tag.file()));
        result_set.push(tag_item(tag, &config.root).with_warnings(warnings));
    }

    result_set.sort();
    Ok(result_set)
}

/// Run tags command
pub fn run_tags(config: &ProjectConfig, name: Option<&str>, render: RenderConfig) -> Result<()> {
    let renderer = Renderer::with_config(render);

    match list_tags(config, name) {
        Ok(result_set) => {
            println!("{}", renderer.render(&result_set));
            Ok(())
        }
        Err(err) => {
            let failed: ResultSet =
                std::iter::once(ResultItem::error(ItemError::from(&err))).collect();
            println!("{}", renderer.render(&failed));
            Err(err.into())
        }
    }
}

fn tag_item(tag: &Tag, root: &Path) -> ResultItem {
    let path = make_relative(tag.file(), root).unwrap_or_else(|| normalize_path(tag.file()));
    let mut item = ResultItem::tag(path, RangeLine::new(tag.logical_start(), tag.logical_end()))
        .with_data(serde_json::json!({
            "name": tag.name(),
            "line": tag.line(),
            "line_text": tag.line_text(),
            "function": tag.function(),
            "class": tag.class(),
        }));
    item.excerpt = Some(tag.logical_text().to_string());
    item
}
