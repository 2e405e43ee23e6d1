//! Error types for Unclutter operations.
//!
//! The filter itself never fails on bad markup: missing bodies, absent
//! attributes and unparseable image sizes all degrade to "no contribution".
//! [`UnclutterError`] covers the surrounding plumbing instead: compiling
//! user-supplied signature selectors, reading input and writing output.
//!
//! # Example
//!
//! ```rust
//! use unclutter_core::{SignatureMatcher, UnclutterError};
//!
//! let result = SignatureMatcher::from_selectors(["[[broken"]);
//! assert!(matches!(result, Err(UnclutterError::HtmlParseError(_))));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for boilerplate filtering operations.
#[derive(Error, Debug)]
pub enum UnclutterError {
    /// Invalid CSS selector.
    ///
    /// Returned when a selector passed to [`crate::Document::select`] or a
    /// custom content signature cannot be parsed.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Reading input failed.
    #[error("Failed to read input: {0}")]
    ReadError(#[source] std::io::Error),

    /// File write errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[source] std::io::Error),

    /// Serializing an outcome or annotations to JSON failed.
    #[error("Failed to serialize output: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Result type alias for UnclutterError.
pub type Result<T> = std::result::Result<T, UnclutterError>;
