//! Embedder trait

use async_trait::async_trait;

use crate::Result;

/// Trait for text embedding backends.
///
/// Implementations must be deterministic for a fixed model and input, and
/// must return vectors of exactly `dimension()` floats. A vector of any
/// other length is a configuration error (the storage schema declares the
/// dimension), never something to recover from at query time.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// The fixed output dimension of this embedder.
    fn dimension(&self) -> usize;
}
