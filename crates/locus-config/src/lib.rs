//! Configuration management for Locus.
//!
//! Parses `locus.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `content.dir`
//! - `content.static_dir`

mod expand;

use std::path::{Path, PathBuf};

use locus_locale::{ExclusionFilter, LocaleRouter, LocaleSet};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override default locale.
    pub default_locale: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "locus.toml";

/// Redirect status codes accepted for locale redirects.
const REDIRECT_STATUSES: &[u16] = &[301, 302, 303, 307, 308];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Locale configuration.
    pub i18n: I18nConfig,
    /// Locale routing exclusions.
    pub routing: RoutingConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,

    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Locale configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Supported locale codes, in display order.
    pub locales: Vec<String>,
    /// Locale used when nothing else matches.
    pub default_locale: String,
    /// Name of the cookie caching the resolved locale.
    pub cookie_name: String,
    /// Response header carrying the resolved locale.
    pub header_name: String,
    /// HTTP status used for locale redirects.
    pub redirect_status: u16,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_owned()],
            default_locale: "en".to_owned(),
            cookie_name: "locale".to_owned(),
            header_name: "x-locale".to_owned(),
            redirect_status: 307,
        }
    }
}

/// Paths excluded from locale routing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Static asset prefixes (e.g. `/static`).
    pub static_prefixes: Vec<String>,
    /// Path segment marking API routes.
    pub api_segment: String,
    /// Exclude any path containing a dot (file extension heuristic).
    pub exclude_dotted: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            static_prefixes: vec!["/static".to_owned(), "/_assets".to_owned()],
            api_segment: "api".to_owned(),
            exclude_dotted: true,
        }
    }
}

/// Raw content configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    dir: Option<String>,
    static_dir: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory holding per-locale page JSON.
    pub dir: PathBuf,
    /// Directory served under the first static prefix.
    pub static_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`SITE_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an RFC 9110 token (cookie and header names).
fn require_token(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    let is_tchar = |b: u8| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b);
    if !value.bytes().all(is_tchar) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a token (letters, digits, and !#$%&'*+-.^_`|~)"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `locus.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated after overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.content_resolved.dir.clone_from(content_dir);
        }
        if let Some(default_locale) = &settings.default_locale {
            self.i18n.default_locale.clone_from(default_locale);
        }
    }

    /// Build the supported-locale set from `[i18n]`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the locale list is empty, contains
    /// malformed or duplicate codes, or lacks the default locale.
    pub fn locale_set(&self) -> Result<LocaleSet, ConfigError> {
        LocaleSet::new(&self.i18n.locales, &self.i18n.default_locale)
            .map_err(|e| ConfigError::Validation(format!("i18n.locales: {e}")))
    }

    /// Build the exclusion filter from `[routing]`.
    #[must_use]
    pub fn exclusion_filter(&self) -> ExclusionFilter {
        ExclusionFilter::new(&self.routing.static_prefixes, self.routing.api_segment.as_str())
            .with_dotted(self.routing.exclude_dotted)
    }

    /// Build the per-request locale router.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the locale set is invalid.
    pub fn locale_router(&self) -> Result<LocaleRouter, ConfigError> {
        Ok(LocaleRouter::new(
            self.locale_set()?,
            self.exclusion_filter(),
            self.i18n.cookie_name.as_str(),
        ))
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            i18n: I18nConfig::default(),
            routing: RoutingConfig::default(),
            content: ContentConfigRaw::default(),
            content_resolved: ContentConfig {
                dir: base.join("content"),
                static_dir: base.join("public"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`Config::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_i18n()?;
        self.validate_routing()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate locale configuration.
    fn validate_i18n(&self) -> Result<(), ConfigError> {
        self.locale_set()?;
        require_token(&self.i18n.cookie_name, "i18n.cookie_name")?;
        require_token(&self.i18n.header_name, "i18n.header_name")?;

        if !REDIRECT_STATUSES.contains(&self.i18n.redirect_status) {
            return Err(ConfigError::Validation(format!(
                "i18n.redirect_status must be one of {REDIRECT_STATUSES:?}, got {}",
                self.i18n.redirect_status
            )));
        }

        Ok(())
    }

    /// Validate routing exclusions.
    fn validate_routing(&self) -> Result<(), ConfigError> {
        for prefix in &self.routing.static_prefixes {
            if !prefix.starts_with('/') || prefix.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "routing.static_prefixes entry {prefix:?} must start with '/' and name a path"
                )));
            }
        }

        require_non_empty(&self.routing.api_segment, "routing.api_segment")?;
        if self.routing.api_segment.contains('/') {
            return Err(ConfigError::Validation(
                "routing.api_segment must be a single path segment".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref dir) = self.content.dir {
            self.content.dir = Some(expand::expand_env(dir, "content.dir")?);
        }
        if let Some(ref dir) = self.content.static_dir {
            self.content.static_dir = Some(expand::expand_env(dir, "content.static_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.content_resolved = ContentConfig {
            dir: resolve(self.content.dir.as_deref(), "content"),
            static_dir: resolve(self.content.static_dir.as_deref(), "public"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.i18n.locales, vec!["en".to_owned()]);
        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(config.i18n.cookie_name, "locale");
        assert_eq!(config.i18n.header_name, "x-locale");
        assert_eq!(config.i18n.redirect_status, 307);
        assert_eq!(config.content_resolved.dir, PathBuf::from("/test/content"));
        assert_eq!(
            config.content_resolved.static_dir,
            PathBuf::from("/test/public")
        );
        assert!(config.routing.exclude_dotted);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.routing.api_segment, "api");
    }

    #[test]
    fn test_parse_i18n_config() {
        let toml = r#"
[i18n]
locales = ["en", "pl", "sv"]
default_locale = "en"
cookie_name = "NEXT_LOCALE"
header_name = "x-site-locale"
redirect_status = 308
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.i18n.locales, vec!["en", "pl", "sv"]);
        assert_eq!(config.i18n.cookie_name, "NEXT_LOCALE");
        assert_eq!(config.i18n.header_name, "x-site-locale");
        assert_eq!(config.i18n.redirect_status, 308);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_i18n_keeps_defaults() {
        let toml = r#"
[i18n]
locales = ["en", "sv"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.i18n.default_locale, "en");
        assert_eq!(config.i18n.cookie_name, "locale");
    }

    #[test]
    fn test_parse_routing_config() {
        let toml = r#"
[routing]
static_prefixes = ["/_next", "/media"]
api_segment = "rpc"
exclude_dotted = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let filter = config.exclusion_filter();

        assert!(filter.should_exclude("/_next/chunk"));
        assert!(filter.should_exclude("/rpc/call"));
        assert!(!filter.should_exclude("/static/app"));
        assert!(!filter.should_exclude("/products/v1.2"));
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[content]
dir = "cms-export"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.content_resolved.dir,
            PathBuf::from("/project/cms-export")
        );
        assert_eq!(
            config.content_resolved.static_dir,
            PathBuf::from("/project/public")
        );
    }

    #[test]
    fn test_locale_router_from_config() {
        let toml = r#"
[i18n]
locales = ["en", "pl", "sv"]
default_locale = "sv"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let router = config.locale_router().unwrap();

        assert_eq!(router.locales().default_locale().as_str(), "sv");
        assert_eq!(router.resolver().cookie_name(), "locale");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[server]
port = 9000

[i18n]
locales = ["en", "pl"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.content_resolved.dir, dir.path().join("content"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/locus.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_validates_after_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[i18n]\nlocales = [\"en\", \"pl\"]\n").unwrap();

        let settings = CliSettings {
            default_locale: Some("de".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("de"));
    }

    #[test]
    fn test_apply_cli_settings_host_and_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_apply_cli_settings_content_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            content_dir: Some(PathBuf::from("/custom/content")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.content_resolved.dir,
            PathBuf::from("/custom/content")
        );
        assert_eq!(
            config.content_resolved.static_dir,
            PathBuf::from("/test/public")
        ); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.i18n.default_locale, "en");
    }

    #[test]
    fn test_expand_env_vars_server_host() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LOCUS_TEST_HOST", "0.0.0.0");
        }

        let toml = r#"
[server]
host = "${LOCUS_TEST_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");

        unsafe {
            std::env::remove_var("LOCUS_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_content_dir_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LOCUS_CONTENT_DIR_TEST");
        }

        let toml = r#"
[content]
dir = "${LOCUS_CONTENT_DIR_TEST:-export}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.content_resolved.dir, PathBuf::from("/project/export"));
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LOCUS_MISSING_STATIC_DIR");
        }

        let toml = r#"
[content]
static_dir = "${LOCUS_MISSING_STATIC_DIR}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("LOCUS_MISSING_STATIC_DIR"));
        assert!(err.to_string().contains("content.static_dir"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_locales_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.locales.clear();
        assert_validation_error(&config, &["i18n.locales", "at least one"]);
    }

    #[test]
    fn test_validate_default_locale_not_supported() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.locales = vec!["pl".to_owned(), "sv".to_owned()];
        assert_validation_error(&config, &["i18n.locales", "\"en\""]);
    }

    #[test]
    fn test_validate_duplicate_locales() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.locales = vec!["en".to_owned(), "pl".to_owned(), "PL".to_owned()];
        assert_validation_error(&config, &["duplicate", "PL"]);
    }

    #[test]
    fn test_validate_malformed_locale() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.locales = vec!["en".to_owned(), "en/us".to_owned()];
        assert_validation_error(&config, &["invalid locale code"]);
    }

    #[test]
    fn test_validate_cookie_name_not_token() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.cookie_name = "my locale".to_owned();
        assert_validation_error(&config, &["i18n.cookie_name", "token"]);
    }

    #[test]
    fn test_validate_header_name_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.header_name = String::new();
        assert_validation_error(&config, &["i18n.header_name", "empty"]);
    }

    #[test]
    fn test_validate_redirect_status() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.i18n.redirect_status = 200;
        assert_validation_error(&config, &["i18n.redirect_status", "200"]);

        config.i18n.redirect_status = 302;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_static_prefix_without_slash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.routing.static_prefixes = vec!["static".to_owned()];
        assert_validation_error(&config, &["routing.static_prefixes", "static"]);
    }

    #[test]
    fn test_validate_static_prefix_root() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.routing.static_prefixes = vec!["/".to_owned()];
        assert_validation_error(&config, &["routing.static_prefixes"]);
    }

    #[test]
    fn test_validate_api_segment() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.routing.api_segment = String::new();
        assert_validation_error(&config, &["routing.api_segment", "empty"]);

        config.routing.api_segment = "api/v1".to_owned();
        assert_validation_error(&config, &["routing.api_segment", "single"]);
    }
}
