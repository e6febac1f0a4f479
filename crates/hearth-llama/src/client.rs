//! The llama.cpp server client.

use crate::sse::{drain_lines, event_payload, parse_chunk};
use async_stream::try_stream;
use async_trait::async_trait;
use futures_util::StreamExt;
use hearth_core::{BackendError, CompletionBackend, CompletionRequest, CompletionStream};
use hearth_retrieval::{Embedder, Embedding, RetrievalError};
use log::debug;
use serde::{Deserialize, Serialize};

/// Client for one `llama-server` instance.
#[derive(Debug, Clone)]
pub struct LlamaServer {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    prompt: &'a str,
    stream: bool,
    n_predict: u32,
    temperature: f32,
    top_k: u32,
    stop: &'a [String],
}

#[derive(Debug, Serialize)]
struct EmbeddingBody<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl LlamaServer {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Probe the server's health endpoint.
    pub async fn is_available(&self) -> bool {
        self.client.get(self.url("/health")).send().await.is_ok()
    }

    async fn post_embedding(&self, query: &str) -> Result<Vec<f32>, BackendError> {
        let response = self
            .client
            .post(self.url("/embedding"))
            .json(&EmbeddingBody { content: query })
            .send()
            .await
            .map_err(connect_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let decoded: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Parse(err.to_string()))?;
        Ok(decoded.embedding)
    }
}

/// Map a request error to a backend error, with a hint for the common case
/// of a server that simply is not running.
fn connect_error(err: reqwest::Error) -> BackendError {
    if err.is_connect() {
        BackendError::Connect(format!("{err} (is llama-server running?)"))
    } else {
        BackendError::Connect(err.to_string())
    }
}

#[async_trait]
impl CompletionBackend for LlamaServer {
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, BackendError> {
        let body = CompletionBody {
            prompt: &request.prompt,
            stream: true,
            n_predict: request.max_tokens,
            temperature: request.temperature,
            top_k: request.top_k,
            stop: &request.stop,
        };
        let response = self
            .client
            .post(self.url("/completion"))
            .json(&body)
            .send()
            .await
            .map_err(connect_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }
        debug!("completion stream opened ({} prompt chars)", request.prompt.len());

        let mut bytes = response.bytes_stream();
        let stream = try_stream! {
            let mut buffer: Vec<u8> = Vec::new();
            'receive: while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|err| BackendError::Stream(err.to_string()))?;
                buffer.extend_from_slice(&chunk);
                for line in drain_lines(&mut buffer) {
                    let Some(payload) = event_payload(&line) else {
                        continue;
                    };
                    let decoded = parse_chunk(payload)?;
                    if !decoded.content.is_empty() {
                        yield decoded.content;
                    }
                    if decoded.stop {
                        break 'receive;
                    }
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl Embedder for LlamaServer {
    async fn embed(&self, query: &str) -> Result<Embedding, RetrievalError> {
        let vector = self
            .post_embedding(query)
            .await
            .map_err(|err| RetrievalError::Embedding(err.to_string()))?;
        Ok(Embedding(vector))
    }
}

#[cfg(test)]
mod tests {
    use super::LlamaServer;
    use pretty_assertions::assert_eq;

    #[test]
    fn urls_are_joined_against_a_trimmed_base() {
        let server = LlamaServer::new("http://127.0.0.1:8080/");
        assert_eq!(server.url("/completion"), "http://127.0.0.1:8080/completion");
        assert_eq!(server.url("/embedding"), "http://127.0.0.1:8080/embedding");
    }
}
