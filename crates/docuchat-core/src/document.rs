//! Document and chunk types for the ingestion pipeline

use serde::{Deserialize, Serialize};

/// A loaded source document: full text plus source metadata
/// (`source` path, `page` number where applicable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: serde_json::Value,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A bounded-length slice of a document's text, the unit of embedding and
/// retrieval. Metadata is inherited from the parent document, plus the
/// chunk's index within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: serde_json::Value,
}
