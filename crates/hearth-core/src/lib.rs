//! Prompt assembly and the streaming turn engine for Hearth.

pub mod backend;
pub mod error;
pub mod filter;
pub mod session;
pub mod sink;
pub mod template;

/// Completion backend contract and request/stream types.
pub use backend::{CompletionBackend, CompletionRequest, CompletionStream};
/// Backend and turn error types.
pub use error::{BackendError, TurnError};
/// The per-session turn engine.
pub use session::{ChatSession, GenerationOptions, TurnOutcome, consume};
/// Output sink contract and stdout implementation.
pub use sink::{OutputSink, StdoutSink};
/// Chat template vocabulary and prompt assembly.
pub use template::ChatTemplate;
