//! Retrieval traits and the embed-then-search combinator.

use crate::error::RetrievalError;
use crate::result::RetrievalResult;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

/// Query embedding vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub Vec<f32>);

/// Turns query text into an embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Compute the embedding for a query string.
    async fn embed(&self, query: &str) -> Result<Embedding, RetrievalError>;
}

/// Nearest-neighbor search over an external vector index.
///
/// `search` is read-only and idempotent for a fixed index state, and returns
/// at most `k` results ordered by descending relevance.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn search(&self, embedding: &Embedding, k: usize)
    -> Result<RetrievalResult, RetrievalError>;
}

/// The seam prompt assembly calls: query text in, context passages out.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievalResult, RetrievalError>;
}

/// Embed-then-search retriever over any embedder/index pair.
#[derive(Clone)]
pub struct QueryRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl QueryRetriever {
    /// Combine an embedder and an index into a retriever.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }
}

#[async_trait]
impl Retriever for QueryRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<RetrievalResult, RetrievalError> {
        let embedding = self.embedder.embed(query).await?;
        let result = self.index.search(&embedding, k).await?;
        debug!(
            "retrieved {} passages (sources: {:?})",
            result.passages.len(),
            result.sources
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{Embedder, Embedding, QueryRetriever, Retriever, VectorIndex};
    use crate::error::RetrievalError;
    use crate::result::RetrievalResult;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _query: &str) -> Result<Embedding, RetrievalError> {
            Ok(Embedding(vec![0.1, 0.2]))
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _query: &str) -> Result<Embedding, RetrievalError> {
            Err(RetrievalError::Embedding("backend down".to_string()))
        }
    }

    struct FixedIndex;

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn search(
            &self,
            _embedding: &Embedding,
            k: usize,
        ) -> Result<RetrievalResult, RetrievalError> {
            let hits = ["alpha", "beta", "gamma"];
            Ok(RetrievalResult {
                passages: hits.iter().take(k).map(|s| s.to_string()).collect(),
                sources: hits.iter().take(k).map(|s| format!("{s}.md")).collect(),
            })
        }
    }

    #[tokio::test]
    async fn retrieve_pairs_passages_with_sources() {
        let retriever = QueryRetriever::new(Arc::new(FixedEmbedder), Arc::new(FixedIndex));
        let result = retriever.retrieve("what is alpha?", 2).await.expect("hits");
        assert_eq!(result.passages, vec!["alpha", "beta"]);
        assert_eq!(result.sources, vec!["alpha.md", "beta.md"]);
    }

    #[tokio::test]
    async fn embedding_failure_is_a_typed_error() {
        let retriever = QueryRetriever::new(Arc::new(FailingEmbedder), Arc::new(FixedIndex));
        let err = retriever.retrieve("query", 3).await.expect_err("typed error");
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }
}
