//! Application state.
//!
//! Shared state for request handlers and the locale middleware.

use std::sync::Arc;

use axum::http::{HeaderName, StatusCode};
use locus_content::ContentSource;
use locus_locale::{LocaleRouter, LocaleSet};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Source of localized page content.
    pub(crate) content: Arc<dyn ContentSource>,
    /// Supported locales.
    pub(crate) locales: LocaleSet,
    /// Application version.
    pub(crate) version: String,
}

/// State of the locale routing middleware.
pub(crate) struct LocaleState {
    /// Routing decisions.
    pub(crate) router: LocaleRouter,
    /// Response header carrying the resolved locale.
    pub(crate) header_name: HeaderName,
    /// Status used for locale redirects.
    pub(crate) redirect_status: StatusCode,
}

impl LocaleState {
    /// Cookie holding the persisted locale.
    pub(crate) fn cookie_name(&self) -> &str {
        self.router.resolver().cookie_name()
    }

    /// First static prefix, where the static directory is mounted.
    pub(crate) fn static_prefix(&self) -> Option<&str> {
        self.router
            .filter()
            .static_prefixes()
            .first()
            .map(String::as_str)
    }

    /// Prefix of API routes (`/api` by default).
    pub(crate) fn api_prefix(&self) -> String {
        format!("/{}", self.router.filter().api_segment())
    }
}
