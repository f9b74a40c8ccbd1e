//! Error types for docprep
//!
//! Every failure names the pipeline step it came from (read, parse, split,
//! write) so the CLI can report it without extra context.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docprep operations
#[derive(Error, Debug)]
pub enum DocprepError {
    /// Source document missing or unreadable
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input could not be interpreted as Markdown
    #[error("Failed to parse markdown: {0}")]
    Parse(String),

    /// The bounded-size splitter rejected a section body
    #[error("Failed to split section text: {0}")]
    Split(String),

    /// Output path unwritable
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF conversion errors
    #[error("PDF processing error: {0}")]
    Pdf(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for docprep operations
pub type Result<T> = std::result::Result<T, DocprepError>;

impl From<lopdf::Error> for DocprepError {
    fn from(err: lopdf::Error) -> Self {
        DocprepError::Pdf(err.to_string())
    }
}

impl From<pdf_extract::OutputError> for DocprepError {
    fn from(err: pdf_extract::OutputError) -> Self {
        DocprepError::Pdf(err.to_string())
    }
}
