//! Logical line segmentation
//!
//! A segmenter turns a whole source file into its logical statements: the
//! multi-line units a tag comment really belongs to, with their line span and
//! enclosing function/class. Only languages with a segmenter get that
//! structural refinement; everything else keeps single-line fidelity.

pub mod python;

use thiserror::Error;

use crate::core::language::Language;

/// One logical statement of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Rendered statement text
    pub text: String,
    /// First physical line (1-based)
    pub start: usize,
    /// Last physical line (1-based, inclusive)
    pub end: usize,
    pub function: Option<String>,
    pub class: Option<String>,
}

/// Why a source could not be segmented
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("line {line}: unexpected closing '{found}'")]
    UnexpectedClose { line: usize, found: char },

    #[error("line {line}: '{open}' closed by '{close}'")]
    MismatchedBracket { line: usize, open: char, close: char },

    #[error("line {line}: '{open}' is never closed")]
    UnclosedBracket { line: usize, open: char },

    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("line {line}: line continuation at end of file")]
    DanglingContinuation { line: usize },
}

/// Splits source text into logical lines
pub trait Segmenter {
    fn segment(&self, source: &str) -> Result<Vec<LogicalLine>, SegmentError>;
}

/// Segmenter for a language, if one exists
pub fn segmenter_for(language: Language) -> Option<Box<dyn Segmenter>> {
    match language {
        Language::Python => Some(Box::new(python::PythonSegmenter)),
        _ => None,
    }
}

/// Render physical lines `start..=end` of `lines` as one block.
///
/// The first line's indentation is removed from every line that carries it
/// and trailing whitespace of the block is trimmed, so a single-line block
/// equals its trimmed line.
pub fn render_block(lines: &[&str], start: usize, end: usize) -> String {
    let block = &lines[start - 1..end];
    let first = block[0];
    let indent = &first[..first.len() - first.trim_start().len()];

    block
        .iter()
        .map(|line| line.strip_prefix(indent).unwrap_or(*line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
