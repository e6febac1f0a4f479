//! HTTP client for a llama.cpp server.
//!
//! Speaks the `llama-server` REST surface: streaming `/completion` for
//! generation and `/embedding` for query vectors. The model itself lives in
//! the server process; this crate only moves bytes.

mod client;
mod sse;

/// The llama.cpp server client.
pub use client::LlamaServer;
