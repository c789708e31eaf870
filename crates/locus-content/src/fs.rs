//! Filesystem content source.
//!
//! Reads CMS content exported as one JSON document per page:
//!
//! ```text
//! content/
//! ├── en/
//! │   ├── index.json          → /en
//! │   ├── about.json          → /en/about
//! │   └── blog/
//! │       └── index.json      → /en/blog
//! └── sv/
//!     └── about.json          → /sv/about
//! ```

use std::io::ErrorKind;
use std::path::PathBuf;

use locus_locale::Locale;

use crate::{ContentError, ContentSource, page_segments};

/// Content source backed by a directory of per-locale JSON files.
#[derive(Debug, Clone)]
pub struct FsContent {
    root: PathBuf,
}

impl FsContent {
    /// Create a source reading from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Candidate files for a page, in lookup order.
    fn candidates(&self, locale: &Locale, segments: &[&str]) -> Vec<PathBuf> {
        let mut base = self.root.join(locale.as_str());
        let Some((last, parents)) = segments.split_last() else {
            return vec![base.join("index.json")];
        };
        for parent in parents {
            base.push(parent);
        }
        vec![
            base.join(format!("{last}.json")),
            base.join(last).join("index.json"),
        ]
    }
}

impl ContentSource for FsContent {
    fn page(&self, locale: &Locale, path: &str) -> Result<serde_json::Value, ContentError> {
        let segments = page_segments(path)?;

        for file in self.candidates(locale, &segments) {
            let bytes = match std::fs::read(&file) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => return Err(ContentError::Io { path: file, source }),
            };
            tracing::debug!(file = %file.display(), "Loaded page content");
            return serde_json::from_slice(&bytes)
                .map_err(|source| ContentError::Parse { path: file, source });
        }

        tracing::debug!(locale = %locale, path, "Page not found");
        Err(ContentError::not_found(locale.as_str(), path))
    }
}
