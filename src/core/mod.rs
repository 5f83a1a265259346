//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Error taxonomy and warnings
//! - Lossy text reading
//! - Project settings discovery
//! - Language detection by extension
//! - Unified result model and rendering
//! - Path normalization utilities

pub mod config;
pub mod error;
pub mod file_reader;
pub mod language;
pub mod model;
pub mod paths;
pub mod render;
