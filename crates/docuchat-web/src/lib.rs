//! Demo web surface for docuchat
//!
//! A small axum server, separate from the RAG path: a static frontend, a
//! mock search endpoint, and a multipart upload endpoint that stores files
//! under an uploads directory and serves them back.

mod handlers;
mod router;
mod state;

pub use router::router;
pub use state::{AppState, DocRecord};

// Re-export core types
pub use docuchat_core::{Error, Result};
