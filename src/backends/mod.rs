//! Backends module - File operations
//!
//! Provides:
//! - scan: File enumeration with the ignore crate

pub mod scan;
