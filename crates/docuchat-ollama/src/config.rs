//! Ollama configuration

use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use docuchat_core::{Error, Result};

/// Configuration for the Ollama client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub chat_model: String,
    pub embed_model: String,
    pub embedding_dim: usize,
}

impl OllamaConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";
    pub const DEFAULT_CHAT_MODEL: &'static str = "llama3.1:8b";
    pub const DEFAULT_EMBED_MODEL: &'static str = "nomic-embed-text";
    pub const DEFAULT_EMBEDDING_DIM: usize = 768;

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|e| {
            Error::Configuration(format!("OLLAMA_BASE_URL is not a valid URL: {}", e))
        })?;

        let chat_model =
            env::var("OLLAMA_MODEL").unwrap_or_else(|_| Self::DEFAULT_CHAT_MODEL.to_string());
        let embed_model = env::var("OLLAMA_EMBED_MODEL")
            .unwrap_or_else(|_| Self::DEFAULT_EMBED_MODEL.to_string());

        let embedding_dim = match env::var("EMBEDDING_DIM") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                Error::Configuration(format!("EMBEDDING_DIM must be a positive integer, got '{}'", raw))
            })?,
            Err(_) => Self::DEFAULT_EMBEDDING_DIM,
        };

        Ok(Self {
            base_url,
            chat_model,
            embed_model,
            embedding_dim,
        })
    }

    /// Create configuration with explicit values
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chat_model: Self::DEFAULT_CHAT_MODEL.to_string(),
            embed_model: Self::DEFAULT_EMBED_MODEL.to_string(),
            embedding_dim: Self::DEFAULT_EMBEDDING_DIM,
        }
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_embed_model(mut self, model: impl Into<String>, dim: usize) -> Self {
        self.embed_model = model.into();
        self.embedding_dim = dim;
        self
    }
}
