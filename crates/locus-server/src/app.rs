//! Router construction.
//!
//! Builds the axum router with all routes and middleware.
//!
//! Locale routing rewrites request URIs, so it cannot be a layer on the page
//! router itself (axum layers run after route matching). Instead the page
//! router becomes the fallback service of an outer router that carries the
//! locale middleware, and the rewritten request is routed by the inner one.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{locale, security};
use crate::state::{AppState, LocaleState};

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `locale_state` - Locale routing configuration
/// * `static_dir` - Directory served under the first static prefix
pub(crate) fn create_router(
    state: Arc<AppState>,
    locale_state: Arc<LocaleState>,
    static_dir: Option<&Path>,
) -> Router {
    let api = locale_state.api_prefix();
    let mut pages = Router::new()
        .route(&format!("{api}/health"), get(handlers::health::get_health))
        .route(&format!("{api}/locales"), get(handlers::locales::get_locales))
        .route("/{locale}", get(handlers::pages::get_root_page))
        .route("/{locale}/{*path}", get(handlers::pages::get_page));

    if let (Some(prefix), Some(dir)) = (locale_state.static_prefix(), static_dir) {
        pages = pages.nest_service(prefix, ServeDir::new(dir));
    }

    let pages = pages.fallback(handlers::not_found).with_state(state);

    Router::new()
        .fallback_service(pages)
        .layer(axum::middleware::from_fn_with_state(
            locale_state,
            locale::route_locale,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::referrer_policy_layer()),
        )
}
