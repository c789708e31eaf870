//! Page endpoint.
//!
//! Serves locale-qualified page paths (`/{locale}/{path}`). Requests
//! rewritten by the locale middleware carry a [`ResolvedLocale`] matching
//! the first segment. Requests that bypassed it (excluded paths that happen
//! to match the route) have their first segment checked against the
//! supported set instead.

use std::sync::Arc;

use axum::Json;
use axum::Extension;
use axum::extract::{Path, State};
use locus_locale::Locale;
use serde::Serialize;

use crate::error::ServerError;
use crate::middleware::locale::ResolvedLocale;
use crate::state::AppState;

/// Response for GET /{locale}/{path}.
#[derive(Debug, Serialize)]
pub(crate) struct PageResponse {
    /// Locale the page is served in.
    locale: String,
    /// Canonical URL path of the page.
    path: String,
    /// The same page in every supported locale, for language switchers.
    alternates: Vec<Alternate>,
    /// Page content from the CMS.
    content: serde_json::Value,
}

/// Link to a page in one locale.
#[derive(Debug, Serialize)]
struct Alternate {
    locale: String,
    path: String,
}

/// Handle GET /{locale} (locale home page).
pub(crate) async fn get_root_page(
    Path(locale): Path<String>,
    State(state): State<Arc<AppState>>,
    resolved: Option<Extension<ResolvedLocale>>,
) -> Result<Json<PageResponse>, ServerError> {
    page_response(&state, resolved, &locale, "")
}

/// Handle GET /{locale}/{path}.
pub(crate) async fn get_page(
    Path((locale, path)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    resolved: Option<Extension<ResolvedLocale>>,
) -> Result<Json<PageResponse>, ServerError> {
    page_response(&state, resolved, &locale, &path)
}

fn page_response(
    state: &AppState,
    resolved: Option<Extension<ResolvedLocale>>,
    segment: &str,
    path: &str,
) -> Result<Json<PageResponse>, ServerError> {
    let locale = match resolved {
        Some(Extension(ResolvedLocale(locale))) => locale,
        None => state
            .locales
            .find_exact(segment)
            .cloned()
            .ok_or_else(|| ServerError::UnsupportedLocale(segment.to_owned()))?,
    };
    let content = state.content.page(&locale, path)?;

    Ok(Json(PageResponse {
        locale: locale.to_string(),
        path: url_path(&locale, path),
        alternates: state
            .locales
            .iter()
            .map(|alt| Alternate {
                locale: alt.to_string(),
                path: url_path(alt, path),
            })
            .collect(),
        content,
    }))
}

/// URL path of `path` in `locale` (`/sv`, `/sv/blog/post`).
fn url_path(locale: &Locale, path: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}/{path}")
    }
}
