//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use locus_content::ContentError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Locale segment of a page path is not a supported locale.
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// Content lookup failed.
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::UnsupportedLocale(locale) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Unsupported locale", "locale": locale}),
            ),
            Self::Content(ContentError::NotFound { locale, path }) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "locale": locale, "path": path}),
            ),
            Self::Content(ContentError::InvalidPath(path)) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid page path", "path": path}),
            ),
            Self::Content(e) => {
                tracing::warn!(error = %e, "Failed to load page content");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": e.to_string()}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
