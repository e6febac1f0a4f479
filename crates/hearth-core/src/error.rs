//! Error types for the turn engine and completion backends.

use hearth_retrieval::RetrievalError;
use thiserror::Error;

/// Errors returned by completion backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The inference server could not be reached.
    #[error("backend unreachable: {0}")]
    Connect(String),
    /// The inference server rejected the request.
    #[error("backend rejected request ({status}): {message}")]
    Api { status: u16, message: String },
    /// A streamed chunk could not be decoded.
    #[error("malformed stream chunk: {0}")]
    Parse(String),
    /// The stream broke mid-generation.
    #[error("stream failed: {0}")]
    Stream(String),
}

/// Failure kinds a single turn can end with.
///
/// The turn engine converts every one of these into a user-visible apology;
/// the typed value is preserved so callers can log kind and cause instead of
/// swallowing the failure.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Inference call failed.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    /// Retrieval call failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),
    /// Generation exceeded the configured turn timeout.
    #[error("generation timed out after {seconds}s")]
    Timeout { seconds: u64 },
    /// Writing to the output sink failed.
    #[error("sink error: {0}")]
    Sink(#[from] std::io::Error),
}
