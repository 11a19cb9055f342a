//! Vector store trait and row types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A row persisted in the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRow {
    pub id: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub embedding: Vec<f32>,
}

/// A row returned from a similarity search, with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRow {
    pub id: String,
    pub content: String,
    pub metadata: serde_json::Value,
    /// Similarity in `[0, 1]`-ish range, higher is closer.
    pub similarity: f32,
}

/// Trait for vector stores (Supabase/pgvector in production, in-memory in
/// tests and offline runs).
///
/// Rows are append-only in this system: nothing here updates or deletes.
/// Batch inserts are best-effort; if an insert fails, callers cannot assume
/// any row of the batch landed.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk-append rows. Returns the number of rows submitted.
    async fn insert_rows(&self, rows: Vec<StoredRow>) -> Result<usize>;

    /// Return at most `k` rows nearest to the query vector, ordered by
    /// non-increasing similarity.
    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredRow>>;

    /// Total number of stored rows.
    async fn count(&self) -> Result<usize>;
}
