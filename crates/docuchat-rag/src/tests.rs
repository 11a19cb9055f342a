//! End-to-end tests for the ingestion and retrieval paths

use async_trait::async_trait;
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use docuchat_core::{Embedder, Error, Result, StoredRow, VectorStore};

use crate::{DirectoryLoader, IngestPipeline, InMemoryVectorStore, Retriever, TextSplitter};

/// Deterministic bag-of-words embedder for tests: each lowercased word is
/// hashed into one of `dim` buckets.
struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dim;
            vector[bucket] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

#[tokio::test]
async fn test_embedder_contract_dimension_and_determinism() {
    let embedder = HashEmbedder::new(32);
    let a = embedder.embed("how many paid holidays").await.unwrap();
    let b = embedder.embed("how many paid holidays").await.unwrap();
    assert_eq!(a.len(), 32);
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_retriever_on_empty_store_returns_empty_string() {
    let embedder = Arc::new(HashEmbedder::new(16));
    let store = Arc::new(InMemoryVectorStore::new());
    let retriever = Retriever::new(embedder, store);

    let output = retriever.retrieve("anything at all").await.unwrap();
    assert_eq!(output, "");
}

#[tokio::test]
async fn test_known_chunk_is_retrieved_top_one() {
    let embedder = Arc::new(HashEmbedder::new(64));
    let store = Arc::new(InMemoryVectorStore::new());

    let holiday_text = "Holiday policy 2026 covers 12 paid holidays.";
    let rows = vec![
        StoredRow {
            id: "holiday".to_string(),
            content: holiday_text.to_string(),
            metadata: json!({"source": "policy.pdf"}),
            embedding: embedder.embed_sync(holiday_text),
        },
        StoredRow {
            id: "lunch".to_string(),
            content: "The cafeteria menu lists soup and salad.".to_string(),
            metadata: json!({"source": "menu.pdf"}),
            embedding: embedder.embed_sync("The cafeteria menu lists soup and salad."),
        },
    ];
    store.insert_rows(rows).await.unwrap();

    let results = store
        .similarity_search(&embedder.embed_sync("how many paid holidays"), 1)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, holiday_text);

    let retriever = Retriever::new(embedder, store);
    let output = retriever.retrieve("how many paid holidays").await.unwrap();
    assert!(output.contains("Source: policy.pdf"));
    assert!(output.contains(holiday_text));
}

#[tokio::test]
async fn test_pipeline_ingests_directory_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("policy.txt"),
        "Holiday policy 2026 covers 12 paid holidays. Employees may carry over \
         up to five unused days. Carried days expire at the end of March.",
    )
    .unwrap();

    let embedder = Arc::new(HashEmbedder::new(16));
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = IngestPipeline::new(
        DirectoryLoader::new(),
        TextSplitter::new(60, 10).unwrap(),
        embedder.clone(),
        store.clone(),
        16,
    )
    .unwrap()
    .with_batch_size(2);

    let report = pipeline.run(dir.path()).await.unwrap();
    assert_eq!(report.documents_loaded, 1);
    assert!(report.chunks_indexed > 1);
    assert_eq!(report.chunks_failed, 0);
    assert!(report.errors.is_empty());
    assert_eq!(store.count().await.unwrap(), report.chunks_indexed);

    let retriever = Retriever::new(embedder, store);
    let output = retriever.retrieve("paid holidays").await.unwrap();
    assert!(output.contains("Source:"));
    assert!(output.contains("paid holidays"));
}

#[tokio::test]
async fn test_pipeline_rejects_dimension_mismatch() {
    let embedder = Arc::new(HashEmbedder::new(16));
    let store = Arc::new(InMemoryVectorStore::new());

    let err = IngestPipeline::new(
        DirectoryLoader::new(),
        TextSplitter::default(),
        embedder,
        store,
        768,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}
