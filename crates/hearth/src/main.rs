//! Hearth: a terminal chat assistant backed by a local model server.

mod shell;

use anyhow::Context;
use clap::Parser;
use hearth_config::HearthConfig;
use hearth_core::{ChatSession, StdoutSink, TurnOutcome};
use hearth_llama::LlamaServer;
use hearth_memory::{MemoryError, MemoryStore};
use hearth_retrieval::{HttpVectorIndex, QueryRetriever, Retriever};
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the chat shell.
#[derive(Debug, Parser)]
#[command(name = "hearth", about = "Terminal chat assistant", version)]
struct Cli {
    /// Path to a JSON5 config file (environment variables override it).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the memory directory from config.
    #[arg(long)]
    memory_dir: Option<PathBuf>,
    /// Ask a single question and exit instead of starting the shell.
    #[arg(long)]
    query: Option<String>,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Config problems are fatal here, before any command loop runs.
    let mut config =
        HearthConfig::load(cli.config.as_deref()).context("configuration is incomplete")?;
    if let Some(dir) = cli.memory_dir {
        config.memory.dir = dir.display().to_string();
    }

    let store = load_store(&config.memory.dir)?;
    let backend = Arc::new(LlamaServer::new(config.model.server_url.clone()));
    let retriever = build_retriever(&config);
    let mut session = ChatSession::new(&config, backend, retriever, store);
    let mut sink = StdoutSink::new(config.bot.prefix.clone());

    match cli.query {
        Some(query) => {
            let outcome = session.take_turn(&query, &mut sink).await;
            persist(&session, &config.memory.dir);
            match outcome {
                TurnOutcome::Completed { .. } => Ok(()),
                TurnOutcome::Failed(err) => Err(err.into()),
            }
        }
        None => shell::run_shell(&config, &mut session, &mut sink).await,
    }
}

/// Load the memory store for the configured directory.
///
/// A missing directory is a configuration problem and aborts startup; an
/// unreadable or corrupt memory file degrades to an empty store.
fn load_store(dir: &str) -> anyhow::Result<MemoryStore> {
    match MemoryStore::load(dir) {
        Ok(store) => Ok(store),
        Err(err @ MemoryError::MissingDir(_)) => {
            Err(anyhow::Error::from(err).context("memory directory is not usable"))
        }
        Err(err) => {
            warn!("could not read memory file ({err}), starting empty");
            Ok(MemoryStore::new())
        }
    }
}

/// Build the retriever when retrieval is configured, embedding queries via
/// the llama server (a dedicated embedding server may be configured).
fn build_retriever(config: &HearthConfig) -> Option<Arc<dyn Retriever>> {
    if !config.retrieval.enabled {
        return None;
    }
    let embedding_url = if config.retrieval.embedding_url.trim().is_empty() {
        config.model.server_url.clone()
    } else {
        config.retrieval.embedding_url.clone()
    };
    let embedder = Arc::new(LlamaServer::new(embedding_url));
    let index = Arc::new(HttpVectorIndex::new(
        config.retrieval.server_url.clone(),
        config.retrieval.collection.clone(),
    ));
    Some(Arc::new(QueryRetriever::new(embedder, index)))
}

/// Persist the session's memory, logging rather than failing on error.
pub(crate) fn persist(session: &ChatSession, dir: &str) {
    if let Err(err) = session.store().persist(dir) {
        warn!("could not persist memory: {err}");
    }
}
