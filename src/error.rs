//! Error types for datasetkv
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DatasetError
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Unified error type for datasetkv operations
#[derive(Debug, Error)]
pub enum DatasetError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Capability Errors
    // -------------------------------------------------------------------------
    #[error("Capability missing: {0}")]
    Capability(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    /// One row's source file could not be read or decoded. The pipeline
    /// catches this per row, logs a warning and skips the row; it is never
    /// fatal to the run.
    #[error("Failed to encode '{}': {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("Record size mismatch for '{key}': expected {expected} bytes, got {actual}")]
    SizeMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Cannot open store at '{}': {reason}", .path.display())]
    BackendOpen { path: PathBuf, reason: String },

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Store error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
