//! HTTP client for a vector-db collection search endpoint.

use crate::error::RetrievalError;
use crate::result::RetrievalResult;
use crate::retriever::{Embedding, VectorIndex};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// REST client searching a single collection of a vector database.
///
/// The server is expected to expose a Milvus-style search endpoint where
/// each hit carries `text` (the passage) and `path` (its source).
#[derive(Debug, Clone)]
pub struct HttpVectorIndex {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    collection_name: &'a str,
    data: Vec<&'a [f32]>,
    limit: usize,
    output_fields: [&'a str; 2],
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    text: String,
    #[serde(default)]
    path: String,
}

impl HttpVectorIndex {
    /// Create a client for one collection of the index at `base_url`.
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            collection: collection.into(),
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/v2/vectordb/entities/search",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl VectorIndex for HttpVectorIndex {
    async fn search(
        &self,
        embedding: &Embedding,
        k: usize,
    ) -> Result<RetrievalResult, RetrievalError> {
        let body = SearchRequest {
            collection_name: &self.collection,
            data: vec![embedding.0.as_slice()],
            limit: k,
            output_fields: ["path", "text"],
        };
        let response = self
            .client
            .post(self.search_url())
            .json(&body)
            .send()
            .await
            .map_err(|err| RetrievalError::Connect(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Search {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: SearchResponse = response
            .json()
            .await
            .map_err(|err| RetrievalError::Decode(err.to_string()))?;

        let mut result = RetrievalResult::default();
        for hit in decoded.data.into_iter().take(k) {
            result.passages.push(hit.text);
            result.sources.push(hit.path);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpVectorIndex, SearchResponse};
    use pretty_assertions::assert_eq;

    #[test]
    fn search_url_tolerates_trailing_slash() {
        let index = HttpVectorIndex::new("http://127.0.0.1:19530/", "docs");
        assert_eq!(
            index.search_url(),
            "http://127.0.0.1:19530/v2/vectordb/entities/search"
        );
    }

    #[test]
    fn hits_decode_text_and_path() {
        let raw = r#"{"code":0,"data":[{"text":"passage","path":"doc.md","distance":0.12}]}"#;
        let decoded: SearchResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(decoded.data.len(), 1);
        assert_eq!(decoded.data[0].text, "passage");
        assert_eq!(decoded.data[0].path, "doc.md");
    }
}
