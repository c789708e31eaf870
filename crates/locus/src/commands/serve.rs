//! `locus serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use locus_config::{CliSettings, Config};
use locus_server::{run_server, server_config_from_locus_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover locus.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Default locale (overrides config).
    #[arg(long, env = "LOCUS_DEFAULT_LOCALE")]
    default_locale: Option<String>,

    /// Enable verbose output (log every request).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            content_dir: self.content_dir,
            default_locale: self.default_locale,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_locus_config(&config, version.to_owned())?;

        output.highlight(&format!(
            "Starting server on http://{}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Locales: {} (default: {})",
            config.i18n.locales.join(", "),
            config.i18n.default_locale
        ));
        output.info(&format!(
            "Content directory: {}",
            config.content_resolved.dir.display()
        ));
        if !config.content_resolved.dir.is_dir() {
            output.warning("Content directory does not exist, all pages will be 404");
        }
        output.info(&format!(
            "Static directory: {}",
            config.content_resolved.static_dir.display()
        ));

        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
