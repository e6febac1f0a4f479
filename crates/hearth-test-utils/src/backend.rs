use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use hearth_core::{BackendError, CompletionBackend, CompletionRequest, CompletionStream};
use std::sync::{Arc, Mutex};

enum Mode {
    /// Simulated raw generation; honors the request's stop sequences.
    Output(String),
    /// Fails mid-stream before producing any text.
    Failing(String),
    /// Never produces anything (exercises timeouts mid-stream).
    Hanging,
    /// Accepts the request but never opens a stream (exercises timeouts
    /// in the connect phase).
    Unresponsive,
}

/// Scripted completion backend recording every prompt it is given.
pub struct StubBackend {
    mode: Mode,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StubBackend {
    pub fn with_output(raw: impl Into<String>) -> Self {
        Self {
            mode: Mode::Output(raw.into()),
            prompts: Arc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            mode: Mode::Failing(message.into()),
            prompts: Arc::default(),
        }
    }

    pub fn hanging() -> Self {
        Self {
            mode: Mode::Hanging,
            prompts: Arc::default(),
        }
    }

    pub fn unresponsive() -> Self {
        Self {
            mode: Mode::Unresponsive,
            prompts: Arc::default(),
        }
    }

    /// Shared handle to the prompts seen so far.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl CompletionBackend for StubBackend {
    async fn stream_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionStream, BackendError> {
        self.prompts
            .lock()
            .expect("prompt log")
            .push(request.prompt.clone());

        match &self.mode {
            Mode::Output(raw) => {
                // Terminate at the earliest stop-sequence occurrence, as a
                // real backend would, then emit word-granularity fragments.
                let mut cut = raw.len();
                for stop in &request.stop {
                    if let Some(index) = raw.find(stop.as_str()) {
                        cut = cut.min(index);
                    }
                }
                let fragments: Vec<Result<String, BackendError>> = raw[..cut]
                    .split_inclusive(' ')
                    .map(|word| Ok(word.to_string()))
                    .collect();
                Ok(stream::iter(fragments).boxed())
            }
            Mode::Failing(message) => {
                let failure = BackendError::Stream(message.clone());
                Ok(stream::iter(vec![Err(failure)]).boxed())
            }
            Mode::Hanging => Ok(stream::pending().boxed()),
            Mode::Unresponsive => futures_util::future::pending().await,
        }
    }
}
