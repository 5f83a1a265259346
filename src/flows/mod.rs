//! Flows module - Commands combining the build and resolve phases
//!
//! Provides:
//! - format: Resolve every documentation file into its `_refers` output
//! - options: The option table, for discovery

pub mod format;
pub mod options;
