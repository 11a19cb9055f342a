//! Ollama client for docuchat
//!
//! Implements the `ChatModel` and `Embedder` traits against a local or
//! remote Ollama server.

mod client;
mod config;

pub use client::OllamaClient;
pub use config::OllamaConfig;

// Re-export core types for convenience
pub use docuchat_core::{ChatModel, Embedder, Error, GenerationConfig, Result};
