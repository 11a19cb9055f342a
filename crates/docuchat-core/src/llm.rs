//! Chat model trait and generation configuration

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Configuration for a single text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub stop_sequences: Vec<String>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: None,
            stop_sequences: Vec::new(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Trait for chat-completion model backends (e.g. Ollama).
///
/// The agent executor drives this one prompt at a time; streaming and tool
/// schemas are deliberately out of scope, the ReAct loop works over plain
/// text completions.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;

    /// Identifier of the underlying model.
    fn model_id(&self) -> &str;
}
