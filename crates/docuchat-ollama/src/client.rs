//! Ollama HTTP client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use docuchat_core::{ChatModel, Embedder, Error, GenerationConfig, Result};

use crate::config::OllamaConfig;

/// Client for a local or remote Ollama server.
///
/// One client serves both roles: `ChatModel` via `/api/generate` and
/// `Embedder` via `/api/embeddings`.
pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new client from configuration
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OllamaConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Verify the server is reachable. Startup check, not a liveness probe.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Ollama unreachable at {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ChatModel(format!(
                "Ollama responded with status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn perform_generation(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let request_body = GenerateRequest {
            model: self.config.chat_model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: GenerateOptions {
                num_predict: config.max_tokens,
                temperature: config.temperature,
                stop: config.stop_sequences.clone(),
            },
        };

        let url = format!("{}/api/generate", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::ChatModel(format!(
                "Ollama generate request failed with status {}: {}",
                status, error_text
            )));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        Ok(data.response)
    }

    async fn perform_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let request_body = EmbeddingRequest {
            model: self.config.embed_model.clone(),
            prompt: text.to_string(),
        };

        let url = format!("{}/api/embeddings", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::Embedding(format!(
                "Ollama embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let data: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        // A wrong-length vector means the configured dimension does not match
        // the model. The storage schema is fixed, so this is fatal.
        if data.embedding.len() != self.config.embedding_dim {
            return Err(Error::Configuration(format!(
                "embedding model '{}' returned {} dimensions but EMBEDDING_DIM is {}",
                self.config.embed_model,
                data.embedding.len(),
                self.config.embedding_dim
            )));
        }

        Ok(data.embedding)
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let generation_future = self.perform_generation(prompt, config);

        match timeout(config.timeout, generation_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "generation did not complete within {:?}",
                config.timeout
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.perform_embedding(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // The embeddings endpoint is single-prompt; batch sequentially to
        // keep ordering and error attribution simple.
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.perform_embedding(text).await?);
        }
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            model: "llama3.1:8b".to_string(),
            prompt: "Question: hi\nThought:".to_string(),
            stream: false,
            options: GenerateOptions {
                num_predict: 512,
                temperature: None,
                stop: vec!["\nObservation:".to_string()],
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3.1:8b");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["stop"][0], "\nObservation:");
        assert!(value["options"].get("temperature").is_none());
    }

    #[test]
    fn test_embedding_response_deserialization() {
        let raw = r#"{"embedding": [0.1, -0.2, 0.3]}"#;
        let parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.embedding.len(), 3);
    }

    #[test]
    fn test_dimension_reported_from_config() {
        let client =
            OllamaClient::new(OllamaConfig::new("http://localhost:11434")).unwrap();
        assert_eq!(client.dimension(), OllamaConfig::DEFAULT_EMBEDDING_DIM);
        assert_eq!(client.model_id(), OllamaConfig::DEFAULT_CHAT_MODEL);
    }
}
