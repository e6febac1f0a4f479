//! Configuration schema for Hearth.

use serde::{Deserialize, Serialize};

/// Root config for the Hearth CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HearthConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub template: TemplateConfig,
}

/// Identity and presentation of the assistant and its user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Assistant display name. Required.
    #[serde(default)]
    pub name: String,
    /// Persona description inserted into every prompt. Required.
    #[serde(default)]
    pub subject: String,
    /// Visual prefix preceding every bot utterance.
    #[serde(default = "default_bot_prefix")]
    pub prefix: String,
    /// User display name shown in the shell prompt and memory records.
    #[serde(default = "default_user_name")]
    pub user_name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            subject: String::new(),
            prefix: default_bot_prefix(),
            user_name: default_user_name(),
        }
    }
}

/// Default visual prefix for bot output.
fn default_bot_prefix() -> String {
    "\r🤖 ".to_string()
}

/// Default user display name.
fn default_user_name() -> String {
    "👤".to_string()
}

/// Inference backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the llama.cpp server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Maximum tokens generated per turn.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,
    /// Top-k sampling cutoff.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Upper bound on a single turn's generation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            top_k: default_top_k(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Default llama.cpp server URL.
fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

/// Default per-turn token budget.
fn default_max_tokens() -> u32 {
    1024
}

/// Default top-k sampling cutoff.
fn default_top_k() -> u32 {
    10
}

/// Default per-turn generation timeout in seconds.
fn default_timeout_secs() -> u64 {
    120
}

/// Conversation memory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Directory holding persisted memory files. Required.
    #[serde(default)]
    pub dir: String,
    /// Number of most-recent records injected into prompt context.
    #[serde(default = "default_recall_window")]
    pub recall_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            recall_window: default_recall_window(),
        }
    }
}

/// Default recall window size.
fn default_recall_window() -> usize {
    5
}

/// Vector retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Whether retrieval augments prompts at all.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the vector index server.
    #[serde(default)]
    pub server_url: String,
    /// Collection searched for context passages. Required when enabled.
    #[serde(default)]
    pub collection: String,
    /// Base URL of the embedding server. Falls back to `model.server_url`.
    #[serde(default)]
    pub embedding_url: String,
    /// Number of passages fetched per query.
    #[serde(default = "default_retrieval_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server_url: String::new(),
            collection: String::new(),
            embedding_url: String::new(),
            top_k: default_retrieval_top_k(),
        }
    }
}

/// Default passage count for retrieval.
fn default_retrieval_top_k() -> usize {
    3
}

/// Prompt template configuration.
///
/// Different backends expect different chat-template syntax, so the role
/// delimiter vocabulary is configuration rather than a hard-coded constant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TemplateConfig {
    /// Named delimiter vocabulary.
    #[serde(default)]
    pub style: TemplateStyle,
    /// Explicit delimiters overriding the named style.
    #[serde(default)]
    pub custom: Option<TemplateDelimiters>,
}

/// Named chat-template styles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStyle {
    /// ChatML `<|im_start|>`/`<|im_end|>` markers.
    #[default]
    Chatml,
    /// `[INST]`-style instruct markers.
    Instruct,
    /// Bare `role:` prefixes for templateless models.
    Plain,
}

/// Explicit role delimiter vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateDelimiters {
    pub system_open: String,
    pub system_close: String,
    pub user_open: String,
    pub user_close: String,
    pub assistant_open: String,
    /// Literal string whose appearance terminates generation.
    pub stop: String,
}
