//! Error types for knowledge stores, PDF extraction and the loader

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Knowledge base not found
    #[error("Knowledge base not found: {0}")]
    NotFound(String),

    /// Knowledge base name is not a valid identifier
    #[error("Invalid knowledge base name: '{0}'")]
    InvalidName(String),

    /// Could not reach the store
    #[error("Communication error: {0}")]
    Communication(String),

    /// The store rejected the query
    #[error("Server error: {0}")]
    Server(String),

    /// Unexpected reply shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while reading PDF text
#[derive(Error, Debug)]
pub enum PdfError {
    /// The file could not be opened or parsed
    #[error("Failed to open PDF {path}: {reason}")]
    Open {
        /// File that failed
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// A single page could not be decoded
    #[error("Failed to read page {page}: {reason}")]
    Page {
        /// 1-based page number
        page: u32,
        /// Parser message
        reason: String,
    },
}

/// Errors that abort a whole loader run
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The source directory could not be read
    #[error("Cannot read directory {path}: {source}")]
    Directory {
        /// Directory that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The knowledge base could not be created or opened
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
