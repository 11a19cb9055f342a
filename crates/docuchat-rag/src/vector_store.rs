//! Vector store implementations

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::json;
use std::env;
use std::sync::RwLock;
use std::time::Duration;

use docuchat_core::{Error, Result, ScoredRow, StoredRow, VectorStore};

/// Configuration for the Supabase vector store
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
    pub table: String,
    pub query_name: String,
    /// Dev-only escape hatch: accept invalid TLS certificates. Off by
    /// default; enable explicitly with `DOCUCHAT_INSECURE_TLS=1`.
    pub insecure_tls: bool,
}

impl SupabaseConfig {
    pub const DEFAULT_TABLE: &'static str = "documents";
    pub const DEFAULT_QUERY_NAME: &'static str = "match_documents";

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let url = env::var("SUPABASE_URL").map_err(|_| {
            Error::Configuration("SUPABASE_URL environment variable not found".to_string())
        })?;
        let service_key = env::var("SUPABASE_SERVICE_KEY").map_err(|_| {
            Error::Configuration("SUPABASE_SERVICE_KEY environment variable not found".to_string())
        })?;

        let insecure_tls = env::var("DOCUCHAT_INSECURE_TLS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            service_key,
            table: Self::DEFAULT_TABLE.to_string(),
            query_name: Self::DEFAULT_QUERY_NAME.to_string(),
            insecure_tls,
        })
    }

    /// Create configuration with explicit values
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            table: Self::DEFAULT_TABLE.to_string(),
            query_name: Self::DEFAULT_QUERY_NAME.to_string(),
            insecure_tls: false,
        }
    }
}

/// Supabase (PostgREST + pgvector) vector store client.
///
/// Rows live in a table with columns `{id, content, metadata, embedding}`;
/// similarity search goes through the server-side `match_documents`
/// function, which returns rows ordered by ascending cosine distance with a
/// computed `similarity` column. Storage and indexing internals stay on the
/// server; this client only inserts rows and calls the match function.
pub struct SupabaseVectorStore {
    config: SupabaseConfig,
    client: Client,
}

impl SupabaseVectorStore {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(&config.service_key)
            .map_err(|_| Error::Configuration("SUPABASE_SERVICE_KEY is not a valid header value".to_string()))?;
        headers.insert("apikey", key_value);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.service_key))
            .map_err(|_| Error::Configuration("SUPABASE_SERVICE_KEY is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        let mut builder = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60));

        if config.insecure_tls {
            tracing::warn!(
                "DOCUCHAT_INSECURE_TLS is set: TLS certificate verification is DISABLED. \
                 Use this only against a local development stack."
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/{}", self.config.url, self.config.query_name)
    }
}

#[async_trait]
impl VectorStore for SupabaseVectorStore {
    async fn insert_rows(&self, rows: Vec<StoredRow>) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let submitted = rows.len();

        // PostgREST bulk insert is best-effort from the caller's view: on
        // failure, none or some of the rows may have landed.
        let response = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::VectorStore(format!(
                "insert into '{}' failed with status {}: {}",
                self.config.table, status, body
            )));
        }

        Ok(submitted)
    }

    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredRow>> {
        let response = self
            .client
            .post(self.rpc_url())
            .query(&[("limit", k.to_string())])
            .json(&json!({
                "query_embedding": query,
                "filter": {},
            }))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::VectorStore(format!(
                "rpc '{}' failed with status {}: {}",
                self.config.query_name, status, body
            )));
        }

        let rows: Vec<ScoredRow> = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        Ok(rows)
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .get(self.table_url())
            .query(&[("select", "id")])
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        // content-range looks like "0-0/42"
        content_range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse::<usize>().ok())
            .ok_or_else(|| {
                Error::VectorStore(format!(
                    "could not parse row count from content-range '{}'",
                    content_range
                ))
            })
    }
}

/// In-memory vector store with cosine-similarity ranking.
///
/// Used by tests and offline runs; mirrors the search contract of the
/// Supabase store (at most k rows, non-increasing similarity).
#[derive(Default)]
pub struct InMemoryVectorStore {
    rows: RwLock<Vec<StoredRow>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert_rows(&self, rows: Vec<StoredRow>) -> Result<usize> {
        let submitted = rows.len();
        let mut store = self
            .rows
            .write()
            .map_err(|e| Error::VectorStore(format!("lock error: {}", e)))?;
        store.extend(rows);
        Ok(submitted)
    }

    async fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredRow>> {
        let store = self
            .rows
            .read()
            .map_err(|e| Error::VectorStore(format!("lock error: {}", e)))?;

        let mut scored: Vec<ScoredRow> = store
            .iter()
            .map(|row| ScoredRow {
                id: row.id.clone(),
                content: row.content.clone(),
                metadata: row.metadata.clone(),
                similarity: Self::cosine_similarity(query, &row.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }

    async fn count(&self) -> Result<usize> {
        let store = self
            .rows
            .read()
            .map_err(|e| Error::VectorStore(format!("lock error: {}", e)))?;
        Ok(store.len())
    }
}
