//! Path rewriting and redirect decisions.
//!
//! Every request that passes the [`ExclusionFilter`] ends in one of two
//! states:
//!
//! - **path has locale**: the first path segment is a supported locale. The
//!   path is normalized (empty segments dropped) and rewritten in place.
//! - **path has no locale**: the locale is resolved from cookie, then
//!   `Accept-Language`, then the default. The default locale is applied with
//!   an internal rewrite so the visible URL stays prefix-free; any other
//!   locale is made explicit with a redirect.
//!
//! Query strings are carried over verbatim in every case.

use std::fmt;

use crate::exclude::ExclusionFilter;
use crate::locale::{Locale, LocaleSet};
use crate::resolve::{LocaleRequest, LocaleResolver};
use crate::session::SessionUpdate;

/// What the middleware does with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingAction {
    /// Forward unchanged; no locale side effects.
    Passthrough,
    /// Change the routing target server-side; the client URL is unchanged.
    Rewrite,
    /// Answer with a 3xx pointing at the locale-prefixed URL.
    Redirect,
}

impl fmt::Display for RoutingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Passthrough => "passthrough",
            Self::Rewrite => "rewrite",
            Self::Redirect => "redirect",
        })
    }
}

/// Outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routing {
    /// Excluded path, served as-is.
    Passthrough,
    /// Internal rewrite to `target` (path plus query).
    Rewrite {
        /// Effective locale.
        locale: Locale,
        /// Locale-qualified path and query.
        target: String,
    },
    /// Redirect the client to `target` (path plus query).
    Redirect {
        /// Effective locale.
        locale: Locale,
        /// Locale-qualified path and query.
        target: String,
    },
}

impl Routing {
    /// The action kind.
    pub fn action(&self) -> RoutingAction {
        match self {
            Self::Passthrough => RoutingAction::Passthrough,
            Self::Rewrite { .. } => RoutingAction::Rewrite,
            Self::Redirect { .. } => RoutingAction::Redirect,
        }
    }

    /// Effective locale, `None` for pass-through.
    pub fn locale(&self) -> Option<&Locale> {
        match self {
            Self::Passthrough => None,
            Self::Rewrite { locale, .. } | Self::Redirect { locale, .. } => Some(locale),
        }
    }

    /// Target path and query, `None` for pass-through.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Passthrough => None,
            Self::Rewrite { target, .. } | Self::Redirect { target, .. } => Some(target),
        }
    }
}

/// Per-request locale router.
///
/// Holds only immutable configuration, so one instance can be shared across
/// all requests without synchronization.
#[derive(Debug, Clone)]
pub struct LocaleRouter {
    resolver: LocaleResolver,
    filter: ExclusionFilter,
}

impl LocaleRouter {
    /// Create a router for `locales`, skipping paths matched by `filter`.
    #[must_use]
    pub fn new(
        locales: LocaleSet,
        filter: ExclusionFilter,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            resolver: LocaleResolver::new(locales, cookie_name),
            filter,
        }
    }

    /// Locale resolver used for locale-less paths.
    pub fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    /// Supported locales.
    pub fn locales(&self) -> &LocaleSet {
        self.resolver.locales()
    }

    /// Exclusion filter.
    pub fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    /// Locale named by the first non-empty path segment, if supported.
    ///
    /// The comparison is exact: `/EN/about` carries no locale.
    pub fn locale_in_path(&self, path: &str) -> Option<&Locale> {
        let first = segments(path).next()?;
        self.locales().find_exact(first)
    }

    /// Decide how to route `request`.
    pub fn route(&self, request: &LocaleRequest<'_>) -> Routing {
        if self.filter.should_exclude(request.path) {
            return Routing::Passthrough;
        }

        if let Some(locale) = self.locale_in_path(request.path) {
            let target = locale_target(locale, segments(request.path).skip(1), request.query);
            return Routing::Rewrite {
                locale: locale.clone(),
                target,
            };
        }

        let locale = self.resolver.resolve(request);
        let target = locale_target(locale, segments(request.path), request.query);
        if self.locales().is_default(locale) {
            Routing::Rewrite {
                locale: locale.clone(),
                target,
            }
        } else {
            Routing::Redirect {
                locale: locale.clone(),
                target,
            }
        }
    }

    /// Cookie and header changes for the response to `request`.
    ///
    /// Returns `None` for pass-through, which must leave the response alone.
    pub fn session_update(
        &self,
        request: &LocaleRequest<'_>,
        routing: &Routing,
    ) -> Option<SessionUpdate> {
        match routing {
            Routing::Passthrough => None,
            _ => Some(SessionUpdate::compute(
                self.resolver.cookie_locale(request),
                routing.locale(),
            )),
        }
    }
}

/// Non-empty `/`-separated segments of a path.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Build `/<locale>/<segments...>[?query]`.
fn locale_target<'a>(
    locale: &Locale,
    segments: impl Iterator<Item = &'a str>,
    query: Option<&str>,
) -> String {
    let mut target = format!("/{locale}");
    for segment in segments {
        target.push('/');
        target.push_str(segment);
    }
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}
