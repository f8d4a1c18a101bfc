//! Error types for the cakit application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during note management operations.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for the cakit application.
///
/// "Not found" and "empty submission" are deliberately absent: the manager
/// reports those outcomes through its return values, never as errors.
#[derive(Error, Debug)]
pub enum NoteError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data exists but does not deserialize into the expected shape.
    #[error("Stored data under '{key}' is corrupt: {source}")]
    StorageCorrupt {
        key: String,
        source: serde_json::Error,
    },

    /// Directory creation or access failed.
    #[error("Failed to create or access directory: {path}")]
    DirectoryError { path: PathBuf },

    /// A reminder value could not be parsed as a timestamp.
    #[error("Invalid reminder timestamp: {value}")]
    InvalidReminder { value: String },

    /// The external editor round-trip failed.
    #[error("{message}")]
    EditorError { message: String },
}
