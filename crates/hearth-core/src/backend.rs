//! Completion backend contract.

use crate::error::BackendError;
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

/// Lazy, finite, forward-only sequence of generated text fragments.
///
/// A stream ends when the backend emits a stop sequence or exhausts the
/// token budget. It is not restartable; each call to
/// [`CompletionBackend::stream_completion`] starts a fresh generation.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String, BackendError>> + Send>>;

/// Parameters for one streaming generation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Fully assembled prompt.
    pub prompt: String,
    /// Literal strings that terminate generation.
    pub stop: Vec<String>,
    /// Token budget for the response.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
}

/// Streaming inference backend.
///
/// Implemented over HTTP by `hearth-llama`; tests substitute deterministic
/// fakes, which is the reason this is a trait rather than a concrete client.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Start a generation and return its fragment stream.
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, BackendError>;
}
