//! `locus resolve` command implementation.
//!
//! Runs the locale router against a request described on the command line
//! and prints the decision, without starting a server. Useful for checking
//! exclusion rules and negotiation against a real `locus.toml`.

use std::path::PathBuf;

use clap::Args;
use locus_config::Config;
use locus_locale::{LocaleHeader, LocaleRequest, LocaleRouter, Routing, SessionUpdate};
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Request target, e.g. `/about?ref=nav`.
    target: String,

    /// Raw `Cookie` header value.
    #[arg(long)]
    cookie: Option<String>,

    /// Raw `Accept-Language` header value.
    #[arg(short = 'l', long)]
    accept_language: Option<String>,

    /// Path to configuration file (default: auto-discover locus.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the decision as JSON.
    #[arg(long)]
    json: bool,
}

/// Routing decision in printable form.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Resolution {
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    set_cookie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<String>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let router = config.locale_router()?;

        let resolution = self.resolve(&router);

        if self.json {
            output.result(&serde_json::to_string_pretty(&resolution)?)?;
            return Ok(());
        }

        output.success(&format!("{}: {}", resolution.action, self.target));
        for (label, value) in [
            ("locale", &resolution.locale),
            ("target", &resolution.target),
            ("set-cookie", &resolution.set_cookie),
            ("header", &resolution.header),
        ] {
            if let Some(value) = value {
                output.result(&format!("{label:<10} {value}"))?;
            }
        }
        Ok(())
    }

    fn resolve(&self, router: &LocaleRouter) -> Resolution {
        let mut request = LocaleRequest::from_target(&self.target);
        request.cookie_header = self.cookie.as_deref();
        request.accept_language = self.accept_language.as_deref();

        let routing = router.route(&request);
        let update = router.session_update(&request, &routing);
        describe(router, &routing, update.as_ref())
    }
}

fn describe(
    router: &LocaleRouter,
    routing: &Routing,
    update: Option<&SessionUpdate>,
) -> Resolution {
    let cookie_name = router.resolver().cookie_name();
    Resolution {
        action: routing.action().to_string(),
        locale: routing.locale().map(ToString::to_string),
        target: routing.target().map(str::to_owned),
        set_cookie: update
            .and_then(|u| u.set_cookie.as_ref())
            .map(|locale| locus_locale::set_cookie_value(cookie_name, locale.as_str())),
        header: update.map(|u| match &u.header {
            LocaleHeader::Set(locale) => locale.to_string(),
            LocaleHeader::Remove => "(removed)".to_owned(),
        }),
    }
}
