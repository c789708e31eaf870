//! Mock content source for testing.
//!
//! Provides [`MockContent`] for unit testing without filesystem access.

use std::collections::HashMap;

use locus_locale::Locale;

use crate::{ContentError, ContentSource, page_segments};

/// In-memory content source.
///
/// # Example
///
/// ```ignore
/// use locus_content::{ContentSource, MockContent};
///
/// let content = MockContent::new()
///     .with_page("en", "about", serde_json::json!({"title": "About"}));
/// ```
#[derive(Debug, Default)]
pub struct MockContent {
    pages: HashMap<(String, String), serde_json::Value>,
}

impl MockContent {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page. `path` is normalized like a request path.
    #[must_use]
    pub fn with_page(mut self, locale: &str, path: &str, content: serde_json::Value) -> Self {
        self.pages.insert((locale.to_owned(), normalize(path)), content);
        self
    }
}

impl ContentSource for MockContent {
    fn page(&self, locale: &Locale, path: &str) -> Result<serde_json::Value, ContentError> {
        let key = page_segments(path)?.join("/");
        self.pages
            .get(&(locale.as_str().to_owned(), key))
            .cloned()
            .ok_or_else(|| ContentError::not_found(locale.as_str(), path))
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mock_content_lookup() {
        let content = MockContent::new().with_page("en", "/blog/post/", json!({"id": 1}));
        let en = Locale::new("en").unwrap();
        let sv = Locale::new("sv").unwrap();

        assert_eq!(content.page(&en, "blog/post").unwrap(), json!({"id": 1}));
        assert!(content.page(&sv, "blog/post").unwrap_err().is_not_found());
    }
}
