//! Core traits and types for docuchat
//!
//! This crate defines the fundamental traits and types shared across the
//! docuchat system: the chat model and embedder seams, the vector store
//! interface, the document/chunk data model, and the chat message types.
//! Keeping them here makes every other crate test-friendly and swappable.

pub mod document;
pub mod embedder;
pub mod error;
pub mod llm;
pub mod message;
pub mod vector_store;

pub use document::{Chunk, Document};
pub use embedder::Embedder;
pub use error::{Error, Result};
pub use llm::{ChatModel, GenerationConfig};
pub use message::{ChatHistory, ChatMessage};
pub use vector_store::{ScoredRow, StoredRow, VectorStore};
