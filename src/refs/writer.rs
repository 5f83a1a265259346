//! Document output
//!
//! A document is streamed line by line into a temporary file next to it,
//! which only replaces the `_refers` output once every reference resolved.
//! Nothing partial ever lands at the output path.

use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::core::error::{RefersError, Result, Site};
use crate::core::file_reader::read_text;
use crate::core::model::Warning;
use crate::core::paths::output_path;
use crate::refs::scan::references;
use crate::refs::view::ViewResolver;

/// What happened to a document's output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Output written with every reference substituted
    Written,
    /// No references; a stale output from an earlier run was deleted
    Removed,
    /// No references and no output to clean up
    Skipped,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Written => "written",
            DocumentStatus::Removed => "removed",
            DocumentStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug)]
pub struct DocumentReport {
    pub output: PathBuf,
    pub status: DocumentStatus,
    pub references: usize,
    pub warnings: Vec<Warning>,
}

/// Resolve every reference of `doc` and write its output file.
///
/// On error the output path is left empty: a temporary file in progress is
/// discarded and any output from an earlier run is deleted as well.
pub fn write_document(doc: &Path, resolver: &ViewResolver) -> Result<DocumentReport> {
    let output = output_path(doc);
    match render_document(doc, &output, resolver) {
        Ok(report) => Ok(report),
        Err(err) => {
            if let Err(cleanup) = remove_output(&output) {
                tracing::warn!(path = %output.display(), error = %cleanup, "failed to delete output");
            }
            Err(err)
        }
    }
}

fn render_document(doc: &Path, output: &Path, resolver: &ViewResolver) -> Result<DocumentReport> {
    let content = read_text(doc)?;
    let write_err = |source: io::Error| RefersError::Write {
        path: output.to_path_buf(),
        source,
    };

    let dir = match doc.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    let mut warnings = Vec::new();
    let mut count = 0usize;

    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        for (idx, line) in content.split_inclusive('\n').enumerate() {
            let mut last = 0;
            for reference in references(line) {
                let text = resolver
                    .resolve(reference.name, reference.option, &mut warnings)
                    .map_err(|err| err.at(Site::new(doc, idx + 1)))?;
                out.write_all(line[last..reference.span.start].as_bytes())
                    .and_then(|_| out.write_all(text.as_bytes()))
                    .map_err(write_err)?;
                last = reference.span.end;
                count += 1;
            }
            out.write_all(line[last..].as_bytes()).map_err(write_err)?;
        }
        out.flush().map_err(write_err)?;
    }

    if count == 0 {
        let status = if remove_output(output)? {
            DocumentStatus::Removed
        } else {
            DocumentStatus::Skipped
        };
        tracing::debug!(path = %doc.display(), status = status.as_str(), "no references");
        return Ok(DocumentReport {
            output: output.to_path_buf(),
            status,
            references: 0,
            warnings,
        });
    }

    match fs::metadata(doc) {
        Ok(meta) => fs::set_permissions(tmp.path(), meta.permissions()).map_err(write_err)?,
        Err(err) => tracing::debug!(path = %doc.display(), error = %err, "keeping default permissions"),
    }
    tmp.persist(output).map_err(|err| write_err(err.error))?;

    tracing::debug!(path = %doc.display(), references = count, "wrote output");
    Ok(DocumentReport {
        output: output.to_path_buf(),
        status: DocumentStatus::Written,
        references: count,
        warnings,
    })
}

/// Delete `output` if present; `Ok(true)` when something was deleted
fn remove_output(output: &Path) -> Result<bool> {
    match fs::remove_file(output) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(RefersError::Write {
            path: output.to_path_buf(),
            source,
        }),
    }
}
