//! Deterministic stubs shared by Hearth test suites.

mod backend;
mod retrieval;
mod sink;

pub use backend::StubBackend;
pub use retrieval::{StubEmbedder, StubRetriever};
pub use sink::RecordingSink;
