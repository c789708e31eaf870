//! HTTP server for Locus multi-locale sites.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Localized pages under `/{locale}/...` from a content source
//! - API endpoints (`/api/health`, `/api/locales`)
//! - Static files under the first configured static prefix
//!
//! Every request first passes through the locale middleware, which resolves
//! the reader's locale, rewrites or redirects locale-less paths and persists
//! the choice in a cookie.
//!
//! # Quick Start
//!
//! ```ignore
//! use locus_locale::{ExclusionFilter, LocaleRouter, LocaleSet};
//! use locus_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let locales = LocaleSet::new(["en", "sv"], "en").unwrap();
//!     let config = ServerConfig::new(
//!         LocaleRouter::new(locales, ExclusionFilter::default(), "locale"),
//!     );
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► security headers + tracing
//!                        │
//!                        ▼
//!                  locale middleware ──redirect──► 3xx + Location
//!                        │ rewrite / passthrough
//!                        ▼
//!                  page router
//!                        ├─► /{locale}/{*path} ──► ContentSource
//!                        ├─► /api/*
//!                        └─► static files (tower-http ServeDir)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use axum::http::{HeaderName, StatusCode};
use locus_content::FsContent;
use locus_locale::LocaleRouter;
use state::{AppState, LocaleState};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory of per-locale page content.
    pub content_dir: PathBuf,
    /// Directory served under the first static prefix.
    pub static_dir: PathBuf,
    /// Locale routing rules.
    pub locale_router: LocaleRouter,
    /// Response header carrying the resolved locale.
    pub locale_header: String,
    /// Status code for locale redirects.
    pub redirect_status: u16,
    /// Application version.
    pub version: String,
}

impl ServerConfig {
    /// Configuration with default settings for `locale_router`.
    #[must_use]
    pub fn new(locale_router: LocaleRouter) -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
            content_dir: PathBuf::from("content"),
            static_dir: PathBuf::from("public"),
            locale_router,
            locale_header: "x-locale".to_owned(),
            redirect_status: 307,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the locale header or redirect status is invalid, or
/// if the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let locale_state = Arc::new(LocaleState {
        header_name: HeaderName::from_str(&config.locale_header)?,
        redirect_status: StatusCode::from_u16(config.redirect_status)?,
        router: config.locale_router,
    });

    let state = Arc::new(AppState {
        content: Arc::new(FsContent::new(config.content_dir)),
        locales: locale_state.router.locales().clone(),
        version: config.version,
    });

    let app = app::create_router(state, Arc::clone(&locale_state), Some(&config.static_dir));

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        locales = locale_state.router.locales().len(),
        default_locale = %locale_state.router.locales().default_locale(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Locus config.
///
/// # Arguments
///
/// * `config` - Locus configuration
/// * `version` - Application version
///
/// # Errors
///
/// Returns `ConfigError::Validation` if the configured locales are invalid.
pub fn server_config_from_locus_config(
    config: &locus_config::Config,
    version: String,
) -> Result<ServerConfig, locus_config::ConfigError> {
    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        content_dir: config.content_resolved.dir.clone(),
        static_dir: config.content_resolved.static_dir.clone(),
        locale_router: config.locale_router()?,
        locale_header: config.i18n.header_name.clone(),
        redirect_status: config.i18n.redirect_status,
        version,
    })
}
