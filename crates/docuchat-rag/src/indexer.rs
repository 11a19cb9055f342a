//! Ingestion pipeline: load, split, embed, store

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use docuchat_core::{Chunk, Embedder, Error, Result, StoredRow, VectorStore};

use crate::loader::DirectoryLoader;
use crate::splitter::TextSplitter;

/// Result of an ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub documents_loaded: usize,
    pub chunks_indexed: usize,
    pub chunks_failed: usize,
    pub errors: Vec<String>,
}

/// One-shot batch pipeline from a document directory into the vector store.
///
/// Runs to completion before any read traffic; there is no incremental or
/// concurrent ingestion. Embedding batches that fail are counted and
/// reported, the run keeps going with the remaining batches (inserts are
/// best-effort, see `VectorStore::insert_rows`).
pub struct IngestPipeline {
    loader: DirectoryLoader,
    splitter: TextSplitter,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    batch_size: usize,
}

impl std::fmt::Debug for IngestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestPipeline")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl IngestPipeline {
    pub const DEFAULT_BATCH_SIZE: usize = 16;

    /// Create a pipeline, verifying the embedder against the dimension the
    /// storage schema declares. A mismatch is fatal configuration, caught
    /// here before anything is embedded or written.
    pub fn new(
        loader: DirectoryLoader,
        splitter: TextSplitter,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        schema_dim: usize,
    ) -> Result<Self> {
        if embedder.dimension() != schema_dim {
            return Err(Error::Configuration(format!(
                "embedder produces {}-dimensional vectors but the store schema declares {}",
                embedder.dimension(),
                schema_dim
            )));
        }

        Ok(Self {
            loader,
            splitter,
            embedder,
            store,
            batch_size: Self::DEFAULT_BATCH_SIZE,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Ingest every supported document under `dir`.
    pub async fn run(&self, dir: impl AsRef<Path>) -> Result<IngestReport> {
        let documents = self.loader.load(dir)?;
        let documents_loaded = documents.len();
        tracing::info!(documents = documents_loaded, "loaded documents");

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| self.splitter.split(doc))
            .collect();
        tracing::info!(chunks = chunks.len(), "split into chunks");

        let mut chunks_indexed = 0;
        let mut chunks_failed = 0;
        let mut errors = Vec::new();

        for batch in chunks.chunks(self.batch_size) {
            match self.index_batch(batch).await {
                Ok(indexed) => chunks_indexed += indexed,
                Err(e) => {
                    chunks_failed += batch.len();
                    errors.push(format!("batch of {} chunks failed: {}", batch.len(), e));
                }
            }
        }

        tracing::info!(
            indexed = chunks_indexed,
            failed = chunks_failed,
            "ingestion finished"
        );

        Ok(IngestReport {
            documents_loaded,
            chunks_indexed,
            chunks_failed,
            errors,
        })
    }

    async fn index_batch(&self, batch: &[Chunk]) -> Result<usize> {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let rows: Vec<StoredRow> = batch
            .iter()
            .zip(vectors)
            .map(|(chunk, embedding)| StoredRow {
                id: Uuid::new_v4().to_string(),
                content: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                embedding,
            })
            .collect();

        self.store.insert_rows(rows).await
    }
}
