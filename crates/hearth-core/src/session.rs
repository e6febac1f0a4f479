//! Per-session turn engine: retrieval, recall, prompt, stream, memorize.

use crate::backend::{CompletionBackend, CompletionRequest, CompletionStream};
use crate::error::TurnError;
use crate::filter::strip_emoji;
use crate::sink::OutputSink;
use crate::template::ChatTemplate;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use hearth_config::{HearthConfig, ModelConfig};
use hearth_memory::{MemoryRecord, MemoryStore};
use hearth_retrieval::Retriever;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Apology rendered when the inference backend fails.
pub const APOLOGY_BACKEND: &str = "Sorry, could you repeat?";
/// Apology rendered for every other turn failure.
pub const APOLOGY_GENERIC: &str = "Sorry, I don't know what happened.";

/// Sampling and budget knobs for a session's generations.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    /// Upper bound on one turn's generation.
    pub timeout: Duration,
}

impl GenerationOptions {
    /// Derive options from model configuration.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_k: config.top_k,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Result of one user turn.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The full response was streamed and memorized.
    Completed { response: String },
    /// The turn failed; an apology was rendered and nothing was memorized.
    Failed(TurnError),
}

/// One conversation: backend, template, memory, and optional retrieval,
/// held as explicit constructed objects so independent sessions can coexist
/// and tests can substitute any seam.
pub struct ChatSession {
    backend: Arc<dyn CompletionBackend>,
    retriever: Option<Arc<dyn Retriever>>,
    template: ChatTemplate,
    store: MemoryStore,
    persona: String,
    bot_name: String,
    user_name: String,
    recall_window: usize,
    retrieval_k: usize,
    options: GenerationOptions,
    clock: fn() -> DateTime<Utc>,
}

impl ChatSession {
    /// Build a session from configuration and its constructed dependencies.
    pub fn new(
        config: &HearthConfig,
        backend: Arc<dyn CompletionBackend>,
        retriever: Option<Arc<dyn Retriever>>,
        store: MemoryStore,
    ) -> Self {
        Self {
            backend,
            retriever,
            template: ChatTemplate::from_config(&config.template),
            store,
            persona: format!("You are {}, {}", config.bot.name, config.bot.subject),
            bot_name: config.bot.name.clone(),
            user_name: config.bot.user_name.clone(),
            recall_window: config.memory.recall_window,
            retrieval_k: config.retrieval.top_k,
            options: GenerationOptions::from_config(&config.model),
            clock: Utc::now,
        }
    }

    /// Substitute the wall clock (tests pin record timestamps with this).
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The memory store owned by this session.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Process one user turn end to end.
    ///
    /// Failures never propagate past this call: they are logged with kind
    /// and cause, rendered as an apology on the sink, and returned typed.
    /// A failed turn memorizes nothing.
    pub async fn take_turn(&mut self, user_message: &str, sink: &mut dyn OutputSink) -> TurnOutcome {
        let asked_at = (self.clock)();
        match self.run_turn(user_message, sink).await {
            Ok(response) => {
                let answered_at = (self.clock)();
                self.store.memorize([
                    MemoryRecord::new(asked_at, self.user_name.clone(), user_message),
                    MemoryRecord::new(answered_at, self.bot_name.clone(), response.clone()),
                ]);
                TurnOutcome::Completed { response }
            }
            Err(err) => {
                warn!("turn failed ({err})");
                let apology = match err {
                    TurnError::Backend(_) => APOLOGY_BACKEND,
                    _ => APOLOGY_GENERIC,
                };
                if let Err(sink_err) = sink.line(apology) {
                    warn!("could not render apology: {sink_err}");
                }
                TurnOutcome::Failed(err)
            }
        }
    }

    async fn run_turn(
        &mut self,
        user_message: &str,
        sink: &mut dyn OutputSink,
    ) -> Result<String, TurnError> {
        let retrieval_context = match &self.retriever {
            Some(retriever) => retriever
                .retrieve(user_message, self.retrieval_k)
                .await?
                .context_block(),
            None => None,
        };

        let memory_context = self.store.recall(self.recall_window);
        let prompt = self.template.build_prompt(
            user_message,
            &self.persona,
            &memory_context,
            retrieval_context.as_deref(),
        );
        debug!("assembled prompt ({} chars)", prompt.len());

        let request = CompletionRequest {
            prompt,
            stop: self.template.stop_sequences(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
            top_k: self.options.top_k,
        };
        // The timeout covers opening the stream as well: a backend that
        // accepts the connection but never answers must not hang the turn.
        let timeout = self.options.timeout;
        let response = tokio::time::timeout(timeout, async {
            let stream = self.backend.stream_completion(request).await?;
            sink.begin_turn()?;
            consume(stream, sink).await
        })
        .await
        .map_err(|_| TurnError::Timeout {
            seconds: timeout.as_secs(),
        })??;
        sink.end_turn()?;
        Ok(response)
    }
}

/// Pull fragments one at a time, forwarding each to the sink and
/// accumulating the full response.
///
/// Emoji are stripped before a fragment reaches the sink or the
/// accumulator, keeping output plain text for the terminal.
pub async fn consume(
    mut stream: CompletionStream,
    sink: &mut dyn OutputSink,
) -> Result<String, TurnError> {
    let mut response = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = strip_emoji(&fragment?);
        if fragment.is_empty() {
            continue;
        }
        sink.write_fragment(&fragment)?;
        response.push_str(&fragment);
    }
    Ok(response)
}
