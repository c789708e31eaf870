//! Supported locales endpoint.
//!
//! Lets clients build a language switcher without hardcoding the locale list.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/locales.
#[derive(Serialize)]
pub(crate) struct LocalesResponse {
    /// Default locale.
    default: String,
    /// All supported locales, in configuration order.
    locales: Vec<String>,
}

/// Handle GET /api/locales.
pub(crate) async fn get_locales(State(state): State<Arc<AppState>>) -> Json<LocalesResponse> {
    Json(LocalesResponse {
        default: state.locales.default_locale().to_string(),
        locales: state.locales.iter().map(ToString::to_string).collect(),
    })
}
