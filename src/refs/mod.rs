//! Reference resolution - the resolve phase
//!
//! Provides:
//! - scan: `@ref:` placeholder detection
//! - view: option table and substitution text
//! - writer: `_refers` output files

pub mod scan;
pub mod view;
pub mod writer;
