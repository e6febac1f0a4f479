//! Error types for retrieval operations.

use thiserror::Error;

/// Errors returned by embedding and vector search calls.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Computing the query embedding failed.
    #[error("embedding failed: {0}")]
    Embedding(String),
    /// The index server could not be reached.
    #[error("index unreachable: {0}")]
    Connect(String),
    /// The index server rejected the search call.
    #[error("search failed ({status}): {message}")]
    Search { status: u16, message: String },
    /// A response body could not be decoded.
    #[error("malformed search response: {0}")]
    Decode(String),
}
