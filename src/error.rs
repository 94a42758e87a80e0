//! Error types for the storage boundary
//!
//! The simulation itself has no fallible paths; only loading and saving
//! the high score and configuration can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not resolve a data directory for this platform")]
    NoDataDir,
}
