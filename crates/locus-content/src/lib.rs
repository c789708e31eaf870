//! Content source abstraction for Locus.
//!
//! Page content comes from a headless CMS. This crate defines the narrow
//! interface the server needs from it, a [`ContentSource`] that turns a
//! locale and page path into JSON, so the server can be run and tested
//! without a live CMS:
//!
//! - [`FsContent`] reads JSON exported per locale to a directory
//! - [`MockContent`] keeps pages in memory (behind `mock` feature flag)
//!
//! # Page Path Convention
//!
//! Page paths are URL paths *without* the locale prefix and without a
//! leading slash:
//! - `""` - home page
//! - `"about"` - standalone page
//! - `"blog/hello-world"` - nested page

mod error;
mod fs;
#[cfg(feature = "mock")]
mod mock;

pub use error::ContentError;
pub use fs::FsContent;
#[cfg(feature = "mock")]
pub use mock::MockContent;

use locus_locale::Locale;

/// Source of localized page content.
pub trait ContentSource: Send + Sync {
    /// Fetch the content of the page at `path` in `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] if the page does not exist in that
    /// locale, or another variant if it cannot be read.
    fn page(&self, locale: &Locale, path: &str) -> Result<serde_json::Value, ContentError>;
}

/// Split a page path into segments, rejecting traversal.
pub(crate) fn page_segments(path: &str) -> Result<Vec<&str>, ContentError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let invalid = segments
        .iter()
        .any(|s| *s == "." || *s == ".." || s.contains(['\\', '\0']));
    if invalid {
        return Err(ContentError::InvalidPath(path.to_owned()));
    }
    Ok(segments)
}
