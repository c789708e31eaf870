//! Locale resolution and URL routing core for Locus.
//!
//! This crate decides, for a single inbound request, which language variant of
//! the site is served and how the request path is adjusted so that page
//! handlers always see a locale-qualified path. It performs no I/O: every
//! decision is derived from the request path, the `Cookie` header and the
//! `Accept-Language` header, plus immutable configuration built at startup.
//!
//! # Architecture
//!
//! ```text
//! LocaleRequest ──► ExclusionFilter ──excluded──► Routing::Passthrough
//!                        │
//!                        ▼
//!                 locale in path? ──yes──► Routing::Rewrite (normalized)
//!                        │ no
//!                        ▼
//!                 LocaleResolver (cookie → Accept-Language → default)
//!                        │
//!                        ├─ default locale ──► Routing::Rewrite
//!                        └─ other locale ────► Routing::Redirect
//! ```
//!
//! The resulting [`Routing`] is paired with a [`SessionUpdate`] describing the
//! cookie and header mutations for the outgoing response. Applying both to an
//! HTTP exchange is the job of the server crate.
//!
//! # Example
//!
//! ```
//! use locus_locale::{ExclusionFilter, LocaleRequest, LocaleRouter, LocaleSet, Routing};
//!
//! let locales = LocaleSet::new(["en", "pl", "sv"], "en").unwrap();
//! let router = LocaleRouter::new(locales, ExclusionFilter::default(), "locale");
//!
//! let request = LocaleRequest::new("/about").with_accept_language("pl-PL,en;q=0.5");
//! match router.route(&request) {
//!     Routing::Redirect { locale, target } => {
//!         assert_eq!(locale.as_str(), "pl");
//!         assert_eq!(target, "/pl/about");
//!     }
//!     other => panic!("unexpected routing: {other:?}"),
//! }
//! ```

mod cookie;
mod exclude;
mod locale;
mod negotiate;
mod resolve;
mod route;
mod session;

pub use cookie::{cookie_value, set_cookie_value};
pub use exclude::ExclusionFilter;
pub use locale::{Locale, LocaleError, LocaleSet};
pub use negotiate::{LanguageRange, negotiate, parse_accept_language};
pub use resolve::{LocaleRequest, LocaleResolver};
pub use route::{LocaleRouter, Routing, RoutingAction};
pub use session::{LocaleHeader, SessionUpdate};
