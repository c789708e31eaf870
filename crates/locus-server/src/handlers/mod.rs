//! HTTP request handlers.

pub(crate) mod health;
pub(crate) mod locales;
pub(crate) mod pages;

use axum::Json;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::json;

/// Fallback for requests no route matches.
pub(crate) async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Not found", "path": uri.path()})),
    )
}
