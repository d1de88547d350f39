//! Error types for the book widget.

use thiserror::Error;

/// Result type alias using BookError.
pub type Result<T> = std::result::Result<T, BookError>;

/// Main error type for parsing, event dispatch and export.
///
/// Animation and setter paths never produce these; they clamp or ignore
/// bad input instead.
#[derive(Error, Debug)]
pub enum BookError {
    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing text output failed.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A colour string was not of the form `#rrggbb`.
    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    /// Unknown material preset name.
    #[error("Unknown material preset: {0}")]
    UnknownMaterial(String),

    /// Unknown flip direction.
    #[error("Unknown flip direction: {0}")]
    UnknownDirection(String),

    /// Unknown emotion name.
    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    /// An event sink refused an event.
    #[error("Event dispatch failed: {0}")]
    Dispatch(String),

    /// Failed to export the scene.
    #[error("Export error: {0}")]
    Export(String),
}
