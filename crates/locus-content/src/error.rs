//! Content error type.

use std::path::PathBuf;

/// Error fetching page content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No page at this path for this locale.
    #[error("Page not found: /{locale}/{path}")]
    NotFound {
        /// Requested locale.
        locale: String,
        /// Requested page path.
        path: String,
    },

    /// Page path contains traversal or forbidden characters.
    #[error("Invalid page path: {0}")]
    InvalidPath(String),

    /// Backend read failure.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Stored content is not valid JSON.
    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(locale: &str, path: &str) -> Self {
        Self::NotFound {
            locale: locale.to_owned(),
            path: path.trim_start_matches('/').to_owned(),
        }
    }

    /// Whether this error means the page does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ContentError::not_found("sv", "/about");
        assert_eq!(err.to_string(), "Page not found: /sv/about");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_io_is_not_not_found() {
        let err = ContentError::Io {
            path: PathBuf::from("/content/en/index.json"),
            source: std::io::Error::other("disk on fire"),
        };
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("/content/en/index.json"));
    }
}
