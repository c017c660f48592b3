//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or duplicating a trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Cannot open trace {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur in the tapset output parser
#[derive(Error, Debug)]
pub enum TapsetError {
    #[error("A tapset parse run is already in progress")]
    AlreadyRunning,

    #[error("Invalid probe search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
