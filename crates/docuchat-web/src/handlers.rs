//! Request handlers for the demo web surface

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::state::{AppState, DocRecord};

/// Extensions accepted by the upload endpoint; `None` allows everything
/// (matching the demo's default).
const ALLOWED_EXTENSIONS: Option<&[&str]> = None;

/// Client-facing error: a 4xx/5xx status with a JSON `{error}` body.
pub struct ClientError {
    status: StatusCode,
    message: String,
}

impl ClientError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
}

/// `POST /api/search` — filter the catalog by case-insensitive title
/// containment; an empty query returns everything.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<serde_json::Value>, ClientError> {
    let query = payload.query.trim().to_lowercase();
    let catalog = state
        .catalog
        .read()
        .map_err(|_| ClientError::internal("catalog lock poisoned"))?;

    let results: Vec<DocRecord> = catalog
        .iter()
        .filter(|doc| query.is_empty() || doc.title.to_lowercase().contains(&query))
        .cloned()
        .collect();

    Ok(Json(json!({ "results": results })))
}

/// `POST /api/upload` — accept a multipart `file` field, store it under the
/// upload directory, and return a doc record for the frontend. Invalid
/// input is rejected with a 400 and nothing is persisted.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<serde_json::Value>), ClientError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ClientError::bad_request(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            return Err(ClientError::bad_request("no selected file"));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ClientError::bad_request(format!("failed to read file field: {}", e)))?;
        file = Some((filename, data.to_vec()));
        break;
    }

    let (filename, data) = file.ok_or_else(|| ClientError::bad_request("no file part"))?;

    let filename = sanitize_filename(&filename)
        .ok_or_else(|| ClientError::bad_request("invalid filename"))?;

    if !extension_allowed(&filename) {
        return Err(ClientError::bad_request("file type not allowed"));
    }

    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| ClientError::internal(format!("cannot create upload dir: {}", e)))?;
    let save_path = state.upload_dir.join(&filename);
    tokio::fs::write(&save_path, &data)
        .await
        .map_err(|e| ClientError::internal(format!("cannot store file: {}", e)))?;

    tracing::info!(file = %filename, bytes = data.len(), "stored upload");

    let doc = DocRecord {
        title: filename.clone(),
        source: "Uploaded".to_string(),
        date_added: chrono::Utc::now().format("%b %Y").to_string(),
        status: "Pending".to_string(),
        likes: 0,
        dislikes: 0,
        link: format!("/uploads/{}", filename),
    };

    if let Ok(mut catalog) = state.catalog.write() {
        catalog.push(doc.clone());
    }

    Ok((StatusCode::CREATED, Json(json!({ "doc": doc }))))
}

/// `GET /uploads/{filename}` — serve a stored upload back; 404 when absent.
pub async fn uploaded_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, StatusCode> {
    let filename = sanitize_filename(&filename).ok_or(StatusCode::NOT_FOUND)?;
    let full = state.upload_dir.join(&filename);

    let data = tokio::fs::read(&full)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data).into_response())
}

/// Strip any path components; reject names that would escape the upload
/// directory.
fn sanitize_filename(raw: &str) -> Option<String> {
    let name = std::path::Path::new(raw).file_name()?.to_str()?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn extension_allowed(filename: &str) -> bool {
    match ALLOWED_EXTENSIONS {
        None => true,
        Some(allowed) => std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| allowed.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("notes.txt"), Some("notes.txt".to_string()));
        assert_eq!(
            sanitize_filename("/etc/passwd"),
            Some("passwd".to_string())
        );
        assert_eq!(
            sanitize_filename("../../secret.txt"),
            Some("secret.txt".to_string())
        );
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename(""), None);
    }
}
