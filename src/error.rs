//! Error types for the photo importer

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for importer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the importer
#[derive(Error, Debug)]
pub enum Error {
    #[error("Library root does not exist: {path}")]
    InvalidLibraryRoot { path: PathBuf },

    #[error("File does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Could not determine a date for {path}")]
    DateResolution {
        path: PathBuf,
        #[source]
        source: MetadataError,
    },

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures reading a capture date out of embedded image metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read metadata from {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("No date tag found in metadata of {path}")]
    MissingDate { path: PathBuf },

    #[error("Unknown date format {value:?} in metadata of {path}")]
    MalformedDate { path: PathBuf, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
