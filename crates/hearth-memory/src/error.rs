//! Error types for memory operations.

use std::path::PathBuf;

/// Errors returned by the memory store.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The configured memory directory does not exist.
    #[error("memory directory does not exist: {0}")]
    MissingDir(PathBuf),
}
