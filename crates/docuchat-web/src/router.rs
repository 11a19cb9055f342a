//! Router for the demo web surface

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router: API routes, upload serving, and the static
/// frontend as a SPA-friendly fallback (unknown paths get `index.html`).
pub fn router(state: Arc<AppState>) -> Router {
    let index = state.frontend_dir.join("index.html");
    let frontend = ServeDir::new(&state.frontend_dir).not_found_service(ServeFile::new(index));

    // Allow-all CORS for local development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", post(handlers::search))
        .route("/api/upload", post(handlers::upload))
        .route("/uploads/:filename", get(handlers::uploaded_file))
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(
            dir.path().join("frontend"),
            dir.path().join("uploads"),
        ));
        (state, dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn search_request(query: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(format!(r#"{{"query": "{}"}}"#, query)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_search_filters_by_title_case_insensitively() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app.oneshot(search_request("holiday")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        for result in results {
            assert!(result["title"]
                .as_str()
                .unwrap()
                .to_lowercase()
                .contains("holiday"));
        }
    }

    #[tokio::test]
    async fn test_search_empty_query_returns_all() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app.oneshot(search_request("")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_no_match_returns_empty_list() {
        let (state, _dir) = test_state();
        let app = router(state);

        let response = app.oneshot(search_request("zzz-nothing")).await.unwrap();
        let body = body_json(response).await;
        assert!(body["results"].as_array().unwrap().is_empty());
    }

    fn multipart_upload_request(filename: &str, content: &str) -> Request<Body> {
        let boundary = "X-DOCUCHAT-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_then_fetch_roundtrip() {
        let (state, _dir) = test_state();

        let response = router(state.clone())
            .oneshot(multipart_upload_request("notes.txt", "meeting notes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["doc"]["title"], "notes.txt");
        assert_eq!(body["doc"]["status"], "Pending");
        assert_eq!(body["doc"]["link"], "/uploads/notes.txt");

        // The stored file is retrievable through the returned link.
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/uploads/notes.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"meeting notes");
    }

    #[tokio::test]
    async fn test_upload_without_file_part_is_rejected() {
        let (state, _dir) = test_state();
        let boundary = "X-DOCUCHAT-BOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             value\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "no file part");
    }

    #[tokio::test]
    async fn test_uploaded_doc_appears_in_search() {
        let (state, _dir) = test_state();

        router(state.clone())
            .oneshot(multipart_upload_request("quarterly-report.txt", "q3"))
            .await
            .unwrap();

        let response = router(state)
            .oneshot(search_request("quarterly"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["source"], "Uploaded");
    }

    #[tokio::test]
    async fn test_missing_upload_is_404() {
        let (state, _dir) = test_state();
        let response = router(state)
            .oneshot(
                Request::builder()
                    .uri("/uploads/absent.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
