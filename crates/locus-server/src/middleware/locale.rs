//! Locale routing middleware.
//!
//! Applies a [`Routing`] decision to each request before page routing runs:
//!
//! - **Passthrough**: the request and response are untouched
//! - **Rewrite**: the request URI is replaced with the locale-qualified
//!   target, a [`ResolvedLocale`] extension is attached and the request
//!   continues to the page router
//! - **Redirect**: the request is answered with a redirect to the target
//!
//! For rewrites and redirects the matching [`SessionUpdate`] is applied to
//! the outgoing response (locale cookie and locale header), including error
//! responses produced by downstream handlers.
//!
//! Because URI rewriting must happen before routing, this middleware wraps
//! the page router from the outside (see `app::create_router`).

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ACCEPT_LANGUAGE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use locus_locale::{Locale, LocaleHeader, LocaleRequest, Routing, SessionUpdate, set_cookie_value};

use crate::state::LocaleState;

/// Locale chosen for a rewritten request, available to handlers as an
/// extension.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedLocale(pub(crate) Locale);

/// Route the request by locale and persist the outcome on the response.
pub(crate) async fn route_locale(
    State(state): State<Arc<LocaleState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_header = cookie_header(request.headers());
    let locale_request = LocaleRequest {
        path: request.uri().path(),
        query: request.uri().query(),
        cookie_header: cookie_header.as_deref(),
        accept_language: request.headers().get(ACCEPT_LANGUAGE).and_then(utf8),
    };
    let routing = state.router.route(&locale_request);
    let update = state.router.session_update(&locale_request, &routing);

    tracing::debug!(
        path = %locale_request.path,
        action = %routing.action(),
        locale = routing.locale().map_or("-", Locale::as_str),
        target = routing.target().unwrap_or("-"),
        "Locale routing"
    );

    let mut response = match routing {
        Routing::Passthrough => return next.run(request).await,
        Routing::Rewrite { locale, target } => {
            match rewrite_uri(request.uri(), &target) {
                Ok(uri) => *request.uri_mut() = uri,
                Err(e) => {
                    tracing::warn!(target = %target, error = %e, "Failed to rewrite request URI");
                    return StatusCode::BAD_REQUEST.into_response();
                }
            }
            request.extensions_mut().insert(ResolvedLocale(locale));
            next.run(request).await
        }
        Routing::Redirect { target, .. } => redirect(state.redirect_status, &target),
    };

    if let Some(update) = update {
        apply_session(response.headers_mut(), &state, &update);
    }
    response
}

/// All `Cookie` headers joined into one.
///
/// HTTP/2 clients may split cookies across several header fields.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(utf8)
        .collect();
    (!values.is_empty()).then(|| values.join("; "))
}

/// Header value as text.
///
/// Unlike [`HeaderValue::to_str`] this accepts non-ASCII UTF-8, which
/// browsers send in unrelated cookies.
fn utf8(value: &HeaderValue) -> Option<&str> {
    std::str::from_utf8(value.as_bytes()).ok()
}

/// Replace the path and query of `uri`, keeping scheme and authority.
fn rewrite_uri(uri: &Uri, target: &str) -> Result<Uri, axum::http::Error> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(target)?);
    Ok(Uri::from_parts(parts)?)
}

fn redirect(status: StatusCode, target: &str) -> Response {
    match HeaderValue::try_from(target) {
        Ok(location) => (status, [(LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!(target = %target, error = %e, "Invalid redirect target");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn apply_session(headers: &mut HeaderMap, state: &LocaleState, update: &SessionUpdate) {
    if let Some(locale) = &update.set_cookie {
        let cookie = set_cookie_value(state.cookie_name(), locale.as_str());
        match HeaderValue::try_from(cookie) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(locale = %locale, error = %e, "Invalid locale cookie"),
        }
    }

    match &update.header {
        LocaleHeader::Set(locale) => match HeaderValue::try_from(locale.as_str()) {
            Ok(value) => {
                headers.insert(state.header_name.clone(), value);
            }
            Err(e) => tracing::warn!(locale = %locale, error = %e, "Invalid locale header"),
        },
        LocaleHeader::Remove => {
            headers.remove(&state.header_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderName;
    use locus_locale::{ExclusionFilter, LocaleRouter, LocaleSet};
    use pretty_assertions::assert_eq;

    use super::*;

    fn state() -> LocaleState {
        let locales = LocaleSet::new(["en", "pl", "sv"], "en").unwrap();
        LocaleState {
            router: LocaleRouter::new(locales, ExclusionFilter::default(), "locale"),
            header_name: HeaderName::from_static("x-locale"),
            redirect_status: StatusCode::TEMPORARY_REDIRECT,
        }
    }

    fn locale(code: &str) -> Locale {
        Locale::new(code).unwrap()
    }

    #[test]
    fn test_cookie_header_joins_fields() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("locale=pl"));

        assert_eq!(
            cookie_header(&headers).as_deref(),
            Some("theme=dark; locale=pl")
        );
        assert_eq!(cookie_header(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_header_keeps_utf8_fields() {
        let mut headers = HeaderMap::new();
        headers.append(
            COOKIE,
            HeaderValue::from_bytes("name=Zoë; locale=sv".as_bytes()).unwrap(),
        );
        headers.append(COOKIE, HeaderValue::from_bytes(b"bad=\xff").unwrap());

        assert_eq!(
            cookie_header(&headers).as_deref(),
            Some("name=Zoë; locale=sv")
        );
    }

    #[test]
    fn test_rewrite_uri_keeps_authority() {
        let uri: Uri = "http://example.com/about?x=1".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "/en/about?x=1").unwrap();

        assert_eq!(rewritten.to_string(), "http://example.com/en/about?x=1");
    }

    #[test]
    fn test_rewrite_uri_origin_form() {
        let uri: Uri = "/".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "/en").unwrap();

        assert_eq!(rewritten.path(), "/en");
        assert_eq!(rewritten.query(), None);
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect(StatusCode::FOUND, "/sv/about");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/sv/about");
    }

    #[test]
    fn test_apply_session_sets_cookie_and_header() {
        let mut headers = HeaderMap::new();
        let update = SessionUpdate::compute(None, Some(&locale("pl")));

        apply_session(&mut headers, &state(), &update);

        assert_eq!(headers[SET_COOKIE], "locale=pl; Path=/; SameSite=Lax");
        assert_eq!(headers["x-locale"], "pl");
    }

    #[test]
    fn test_apply_session_overwrites_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-locale", HeaderValue::from_static("en"));
        let update = SessionUpdate::compute(Some("sv"), Some(&locale("sv")));

        apply_session(&mut headers, &state(), &update);

        assert!(headers.get(SET_COOKIE).is_none());
        assert_eq!(headers.get_all("x-locale").iter().count(), 1);
        assert_eq!(headers["x-locale"], "sv");
    }

    #[test]
    fn test_apply_session_removes_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-locale", HeaderValue::from_static("en"));
        let update = SessionUpdate::compute(None, None);

        apply_session(&mut headers, &state(), &update);

        assert!(headers.get("x-locale").is_none());
        assert!(headers.get(SET_COOKIE).is_none());
    }
}
