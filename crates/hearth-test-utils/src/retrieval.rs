use async_trait::async_trait;
use hearth_retrieval::{Embedder, Embedding, RetrievalError, RetrievalResult, Retriever};

/// Retriever returning a fixed passage/source pairing.
#[derive(Clone, Default)]
pub struct StubRetriever {
    result: RetrievalResult,
    failure: Option<String>,
}

impl StubRetriever {
    pub fn with_passages(passages: &[&str], sources: &[&str]) -> Self {
        Self {
            result: RetrievalResult {
                passages: passages.iter().map(|s| s.to_string()).collect(),
                sources: sources.iter().map(|s| s.to_string()).collect(),
            },
            failure: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: RetrievalResult::default(),
            failure: Some(message.into()),
        }
    }
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn retrieve(&self, _query: &str, k: usize) -> Result<RetrievalResult, RetrievalError> {
        if let Some(message) = &self.failure {
            return Err(RetrievalError::Embedding(message.clone()));
        }
        Ok(RetrievalResult {
            passages: self.result.passages.iter().take(k).cloned().collect(),
            sources: self.result.sources.iter().take(k).cloned().collect(),
        })
    }
}

/// Embedder returning a fixed vector.
#[derive(Clone)]
pub struct StubEmbedder {
    vector: Vec<f32>,
}

impl StubEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, _query: &str) -> Result<Embedding, RetrievalError> {
        Ok(Embedding(self.vector.clone()))
    }
}
