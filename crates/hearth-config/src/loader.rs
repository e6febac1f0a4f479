//! Config loading: file layer, environment overrides, validation.

use crate::error::ConfigError;
use crate::model::HearthConfig;
use log::debug;
use std::path::Path;

/// Environment variable names recognized by [`HearthConfig::load`].
pub const ENV_VARS: [&str; 10] = [
    "HEARTH_BOT_NAME",
    "HEARTH_BOT_SUBJECT",
    "HEARTH_BOT_PREFIX",
    "HEARTH_USER_NAME",
    "HEARTH_MODEL_URL",
    "HEARTH_MEMORY_DIR",
    "HEARTH_RECALL_WINDOW",
    "HEARTH_RETRIEVAL_URL",
    "HEARTH_EMBEDDING_URL",
    "HEARTH_COLLECTION",
];

impl HearthConfig {
    /// Load config from an optional file, apply environment overrides, and
    /// validate. This is the startup entry point: any error here aborts the
    /// process before the command loop runs.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON5 config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = json5::from_str(&raw)?;
        debug!("loaded config file {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a key/value lookup.
    ///
    /// Split out from [`HearthConfig::load`] so tests can substitute a map
    /// for the process environment.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("HEARTH_BOT_NAME") {
            self.bot.name = value;
        }
        if let Some(value) = lookup("HEARTH_BOT_SUBJECT") {
            self.bot.subject = value;
        }
        if let Some(value) = lookup("HEARTH_BOT_PREFIX") {
            self.bot.prefix = value;
        }
        if let Some(value) = lookup("HEARTH_USER_NAME") {
            self.bot.user_name = value;
        }
        if let Some(value) = lookup("HEARTH_MODEL_URL") {
            self.model.server_url = value;
        }
        if let Some(value) = lookup("HEARTH_MEMORY_DIR") {
            self.memory.dir = value;
        }
        if let Some(value) = lookup("HEARTH_RECALL_WINDOW") {
            self.memory.recall_window =
                value.parse().map_err(|_| ConfigError::InvalidField {
                    path: "memory.recall_window".to_string(),
                    message: format!("not a valid count: {value}"),
                })?;
        }
        if let Some(value) = lookup("HEARTH_RETRIEVAL_URL") {
            self.retrieval.server_url = value;
            self.retrieval.enabled = true;
        }
        if let Some(value) = lookup("HEARTH_EMBEDDING_URL") {
            self.retrieval.embedding_url = value;
        }
        if let Some(value) = lookup("HEARTH_COLLECTION") {
            self.retrieval.collection = value;
        }
        Ok(())
    }

    /// Check required settings and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.name.trim().is_empty() {
            return Err(missing("bot.name", "HEARTH_BOT_NAME"));
        }
        if self.bot.subject.trim().is_empty() {
            return Err(missing("bot.subject", "HEARTH_BOT_SUBJECT"));
        }
        if self.memory.dir.trim().is_empty() {
            return Err(missing("memory.dir", "HEARTH_MEMORY_DIR"));
        }
        if self.model.server_url.trim().is_empty() {
            return Err(missing("model.server_url", "HEARTH_MODEL_URL"));
        }
        if self.model.max_tokens == 0 {
            return Err(ConfigError::InvalidField {
                path: "model.max_tokens".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.model.timeout_secs == 0 {
            return Err(ConfigError::InvalidField {
                path: "model.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.retrieval.enabled {
            if self.retrieval.server_url.trim().is_empty() {
                return Err(missing("retrieval.server_url", "HEARTH_RETRIEVAL_URL"));
            }
            if self.retrieval.collection.trim().is_empty() {
                return Err(missing("retrieval.collection", "HEARTH_COLLECTION"));
            }
        }
        Ok(())
    }
}

/// Build the missing-setting error for a path/variable pair.
fn missing(path: &str, var: &str) -> ConfigError {
    ConfigError::MissingSetting {
        path: path.to_string(),
        var: var.to_string(),
    }
}
