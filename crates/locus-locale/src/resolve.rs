//! Locale resolution from request signals.

use crate::cookie::cookie_value;
use crate::locale::{Locale, LocaleSet};
use crate::negotiate::negotiate;

/// The parts of an inbound request that locale routing looks at.
///
/// Header values are passed raw; parsing happens during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocaleRequest<'a> {
    /// URL path (e.g. `/about`).
    pub path: &'a str,
    /// Query string without the leading `?` (`None` if the URL has no `?`).
    pub query: Option<&'a str>,
    /// Raw `Cookie` header.
    pub cookie_header: Option<&'a str>,
    /// Raw `Accept-Language` header.
    pub accept_language: Option<&'a str>,
}

impl<'a> LocaleRequest<'a> {
    /// Request for `path` with no query and no headers.
    #[must_use]
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    /// Split a request target (`/about?ref=x`) into path and query.
    #[must_use]
    pub fn from_target(target: &'a str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self::new(path).with_query(query),
            None => Self::new(target),
        }
    }

    /// Set the query string (without `?`).
    #[must_use]
    pub fn with_query(mut self, query: &'a str) -> Self {
        self.query = Some(query);
        self
    }

    /// Set the raw `Cookie` header.
    #[must_use]
    pub fn with_cookie_header(mut self, cookie_header: &'a str) -> Self {
        self.cookie_header = Some(cookie_header);
        self
    }

    /// Set the raw `Accept-Language` header.
    #[must_use]
    pub fn with_accept_language(mut self, accept_language: &'a str) -> Self {
        self.accept_language = Some(accept_language);
        self
    }
}

/// Resolves the effective locale for requests whose path carries none.
///
/// Precedence, first match wins:
/// 1. locale cookie, if it names a supported locale
/// 2. `Accept-Language` negotiation (see [`negotiate()`])
/// 3. default locale
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    locales: LocaleSet,
    cookie_name: String,
}

impl LocaleResolver {
    /// Create a resolver reading the locale cookie named `cookie_name`.
    #[must_use]
    pub fn new(locales: LocaleSet, cookie_name: impl Into<String>) -> Self {
        Self {
            locales,
            cookie_name: cookie_name.into(),
        }
    }

    /// Supported locales.
    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    /// Name of the locale cookie.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Raw value of the locale cookie, whether or not it is supported.
    pub fn cookie_locale<'r>(&self, request: &LocaleRequest<'r>) -> Option<&'r str> {
        request
            .cookie_header
            .and_then(|header| cookie_value(header, &self.cookie_name))
    }

    /// Resolve the locale for `request`. Never fails.
    pub fn resolve(&self, request: &LocaleRequest<'_>) -> &Locale {
        if let Some(locale) = self
            .cookie_locale(request)
            .and_then(|value| self.locales.find(value))
        {
            return locale;
        }

        if let Some(locale) = request
            .accept_language
            .and_then(|header| negotiate(header, &self.locales))
        {
            return locale;
        }

        self.locales.default_locale()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn resolver() -> LocaleResolver {
        LocaleResolver::new(LocaleSet::new(["en", "pl", "sv"], "en").unwrap(), "locale")
    }

    fn resolve(cookie: Option<&str>, accept_language: Option<&str>) -> String {
        let request = LocaleRequest {
            path: "/",
            query: None,
            cookie_header: cookie,
            accept_language,
        };
        resolver().resolve(&request).to_string()
    }

    #[test]
    fn test_from_target_splits_query() {
        let request = LocaleRequest::from_target("/about?ref=newsletter");
        assert_eq!(request.path, "/about");
        assert_eq!(request.query, Some("ref=newsletter"));

        let request = LocaleRequest::from_target("/about");
        assert_eq!(request.query, None);

        let request = LocaleRequest::from_target("/about?");
        assert_eq!(request.query, Some(""));
    }

    #[test]
    fn test_cookie_resolves() {
        assert_eq!(resolve(Some("locale=sv"), None), "sv");
    }

    #[test]
    fn test_cookie_beats_accept_language() {
        assert_eq!(resolve(Some("locale=sv"), Some("pl")), "sv");
    }

    #[test]
    fn test_unsupported_cookie_falls_through() {
        assert_eq!(resolve(Some("locale=de"), Some("pl")), "pl");
        assert_eq!(resolve(Some("locale=de"), None), "en");
    }

    #[test]
    fn test_cookie_case_is_normalized() {
        assert_eq!(resolve(Some("locale=SV"), None), "sv");
    }

    #[test]
    fn test_accept_language_prefix_match() {
        assert_eq!(resolve(None, Some("pl-PL,en;q=0.5")), "pl");
    }

    #[test]
    fn test_accept_language_without_match_uses_default() {
        assert_eq!(resolve(None, Some("de-DE")), "en");
    }

    #[test]
    fn test_malformed_accept_language_uses_default() {
        assert_eq!(resolve(None, Some(";;;q=x")), "en");
    }

    #[test]
    fn test_no_signals_uses_default() {
        assert_eq!(resolve(None, None), "en");
    }

    #[test]
    fn test_cookie_locale_returns_raw_value() {
        let resolver = resolver();
        let request = LocaleRequest::new("/").with_cookie_header("a=1; locale=xx");
        assert_eq!(resolver.cookie_locale(&request), Some("xx"));
    }
}
