//! Tag extraction - the build phase
//!
//! A fast single-line scan registers every tag; files with a segmenter then
//! get their tags refined to full logical statements.

pub mod api;
pub mod reconcile;
pub mod registry;
pub mod scan;
