//! Query-time retriever

use std::sync::Arc;

use docuchat_core::{Embedder, Result, ScoredRow, VectorStore};

/// Embeds a free-text query, runs a nearest-neighbour search, and
/// serializes the matches as labeled text blocks for a language model to
/// read.
///
/// Stateless; safe to call repeatedly.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    top_k: usize,
}

impl Retriever {
    pub const DEFAULT_TOP_K: usize = 2;

    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            top_k: Self::DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Retrieve the chunks most relevant to `query` as a single serialized
    /// string; empty string when nothing is stored or nothing matches.
    pub async fn retrieve(&self, query: &str) -> Result<String> {
        let query_vector = self.embedder.embed(query).await?;
        let rows = self
            .store
            .similarity_search(&query_vector, self.top_k)
            .await?;

        Ok(Self::serialize_rows(&rows))
    }

    fn serialize_rows(rows: &[ScoredRow]) -> String {
        rows.iter()
            .map(|row| {
                let source = row
                    .metadata
                    .get("source")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown Source");
                format!("Source: {}\nContent: {}", source, row.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
