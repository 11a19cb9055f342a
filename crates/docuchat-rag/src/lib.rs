//! Document ingestion and retrieval pipeline for docuchat
//!
//! Write path: `DirectoryLoader` -> `TextSplitter` -> `Embedder` ->
//! `VectorStore` (driven by `IngestPipeline`). Read path: `Retriever`
//! embeds a query and serializes the nearest stored chunks.

mod indexer;
mod loader;
mod retriever;
mod splitter;
mod vector_store;

#[cfg(test)]
mod tests;

pub use indexer::{IngestPipeline, IngestReport};
pub use loader::{DirectoryLoader, LoaderConfig};
pub use retriever::Retriever;
pub use splitter::TextSplitter;
pub use vector_store::{InMemoryVectorStore, SupabaseConfig, SupabaseVectorStore};

// Re-export core types for convenience
pub use docuchat_core::{
    Chunk, Document, Embedder, Error, Result, ScoredRow, StoredRow, VectorStore,
};
