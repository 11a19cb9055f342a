//! Shared state for the demo web server

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

/// A document record as the frontend displays it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRecord {
    pub title: String,
    pub source: String,
    pub date_added: String,
    pub status: String,
    pub likes: u32,
    pub dislikes: u32,
    pub link: String,
}

/// Server state: where files live plus the in-memory document catalog.
///
/// The catalog starts with sample records; uploads are appended so they
/// show up in search results for the session. Nothing is persisted across
/// restarts.
pub struct AppState {
    pub frontend_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub catalog: RwLock<Vec<DocRecord>>,
}

impl AppState {
    pub fn new(frontend_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            frontend_dir: frontend_dir.into(),
            upload_dir: upload_dir.into(),
            catalog: RwLock::new(Self::sample_catalog()),
        }
    }

    /// The demo's seed records.
    fn sample_catalog() -> Vec<DocRecord> {
        vec![
            DocRecord {
                title: "US 2026 Statutory Holidays Calendar".to_string(),
                source: "Intranet".to_string(),
                date_added: "Oct 2025".to_string(),
                status: "Approved".to_string(),
                likes: 21,
                dislikes: 2,
                link: "#".to_string(),
            },
            DocRecord {
                title: "Company Holiday Policy 2026".to_string(),
                source: "HR Docs".to_string(),
                date_added: "Nov 2025".to_string(),
                status: "Approved".to_string(),
                likes: 7,
                dislikes: 0,
                link: "#".to_string(),
            },
        ]
    }
}
