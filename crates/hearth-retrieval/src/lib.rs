//! Vector retrieval contract and clients for Hearth.
//!
//! Prompt assembly only ever sees the [`Retriever`] seam; the embedding and
//! index halves are separate traits so either can be substituted in tests.

pub mod error;
pub mod http;
pub mod result;
pub mod retriever;

/// Retrieval error type.
pub use error::RetrievalError;
/// HTTP vector index client.
pub use http::HttpVectorIndex;
/// Search result model.
pub use result::RetrievalResult;
/// Retrieval traits and the embed-then-search combinator.
pub use retriever::{Embedder, Embedding, QueryRetriever, Retriever, VectorIndex};
