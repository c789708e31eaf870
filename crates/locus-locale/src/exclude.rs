//! Exclusion filter: paths that bypass locale handling entirely.
//!
//! Static assets, API routes and anything that looks like a file are served
//! as-is, without locale resolution, rewriting, or cookie/header updates.

/// Static asset prefixes excluded by default.
const DEFAULT_STATIC_PREFIXES: &[&str] = &["/static", "/_assets"];

/// API marker segment excluded by default.
const DEFAULT_API_SEGMENT: &str = "api";

/// Predicate deciding which request paths skip locale handling.
///
/// A path is excluded when it
/// - starts with a static asset prefix (on a segment boundary),
/// - contains the API marker as one of its segments, or
/// - contains a dot anywhere (file extension heuristic, optional).
///
/// The dot heuristic also excludes page routes whose slug contains a dot
/// (e.g. `/products/v1.2`). Disable it with [`ExclusionFilter::with_dotted`]
/// when such routes exist.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    static_prefixes: Vec<String>,
    api_segment: String,
    exclude_dotted: bool,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self {
            static_prefixes: DEFAULT_STATIC_PREFIXES
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            api_segment: DEFAULT_API_SEGMENT.to_owned(),
            exclude_dotted: true,
        }
    }
}

impl ExclusionFilter {
    /// Create a filter with explicit prefixes and API marker segment.
    ///
    /// Trailing slashes on prefixes are ignored.
    #[must_use]
    pub fn new<I, S>(static_prefixes: I, api_segment: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            static_prefixes: static_prefixes
                .into_iter()
                .map(|p| p.as_ref().trim_end_matches('/').to_owned())
                .filter(|p| !p.is_empty())
                .collect(),
            api_segment: api_segment.into(),
            exclude_dotted: true,
        }
    }

    /// Enable or disable the "path contains a dot" heuristic.
    #[must_use]
    pub fn with_dotted(mut self, exclude_dotted: bool) -> Self {
        self.exclude_dotted = exclude_dotted;
        self
    }

    /// Configured static asset prefixes.
    pub fn static_prefixes(&self) -> &[String] {
        &self.static_prefixes
    }

    /// Path segment marking API routes.
    pub fn api_segment(&self) -> &str {
        &self.api_segment
    }

    /// Return `true` if `path` must bypass all locale logic.
    pub fn should_exclude(&self, path: &str) -> bool {
        self.has_static_prefix(path) || self.has_api_segment(path) || self.is_dotted(path)
    }

    fn has_static_prefix(&self, path: &str) -> bool {
        self.static_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    fn has_api_segment(&self, path: &str) -> bool {
        !self.api_segment.is_empty() && path.split('/').any(|s| s == self.api_segment)
    }

    fn is_dotted(&self, path: &str) -> bool {
        self.exclude_dotted && path.contains('.')
    }
}
