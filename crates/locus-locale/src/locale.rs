//! Locale codes and the supported-locale set.

use std::fmt;

/// Maximum length of a locale code (BCP 47 practical limit for `language-region`).
const MAX_CODE_LEN: usize = 35;

/// Error building a [`Locale`] or [`LocaleSet`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    /// The supported-locale list is empty.
    #[error("at least one locale must be configured")]
    Empty,
    /// A code is not a well-formed locale tag.
    #[error("invalid locale code: {0:?}")]
    InvalidCode(String),
    /// A code appears more than once (compared case-insensitively).
    #[error("duplicate locale code: {0}")]
    Duplicate(String),
    /// The default locale is not a member of the supported list.
    #[error("default locale {0:?} is not in the supported locales")]
    UnknownDefault(String),
}

/// A supported language variant of the site, e.g. `en` or `pt-BR`.
///
/// Codes are ASCII alphanumeric subtags separated by `-`. The spelling given
/// in configuration is preserved and is what appears in URLs and cookies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Validate and create a locale code.
    pub fn new(code: &str) -> Result<Self, LocaleError> {
        if is_valid_code(code) {
            Ok(Self(code.to_owned()))
        } else {
            Err(LocaleError::InvalidCode(code.to_owned()))
        }
    }

    /// The locale code as configured.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Text before the first region/script separator of a language tag.
pub(crate) fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code
            .split('-')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// The closed, ordered set of locales the site is published in.
///
/// Built once at startup and never mutated. Membership defines validity;
/// order is only used when enumerating locales (e.g. for a language picker).
#[derive(Debug, Clone)]
pub struct LocaleSet {
    locales: Vec<Locale>,
    default_index: usize,
}

impl LocaleSet {
    /// Create a locale set from configured codes and the default code.
    ///
    /// # Errors
    ///
    /// Returns [`LocaleError`] if the list is empty, a code is malformed or
    /// duplicated, or the default is not one of the codes.
    pub fn new<I, S>(codes: I, default_locale: &str) -> Result<Self, LocaleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locales: Vec<Locale> = Vec::new();
        for code in codes {
            let locale = Locale::new(code.as_ref())?;
            if locales
                .iter()
                .any(|existing| existing.0.eq_ignore_ascii_case(&locale.0))
            {
                return Err(LocaleError::Duplicate(locale.0));
            }
            locales.push(locale);
        }

        if locales.is_empty() {
            return Err(LocaleError::Empty);
        }

        let default_index = locales
            .iter()
            .position(|l| l.0 == default_locale)
            .ok_or_else(|| LocaleError::UnknownDefault(default_locale.to_owned()))?;

        Ok(Self {
            locales,
            default_index,
        })
    }

    /// The designated default locale.
    pub fn default_locale(&self) -> &Locale {
        &self.locales[self.default_index]
    }

    /// Look up a supported locale, ignoring ASCII case.
    pub fn find(&self, candidate: &str) -> Option<&Locale> {
        self.locales
            .iter()
            .find(|l| l.0.eq_ignore_ascii_case(candidate))
    }

    /// Look up a supported locale by its exact configured spelling.
    pub fn find_exact(&self, candidate: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.0 == candidate)
    }

    /// Check whether `locale` is the default locale.
    pub fn is_default(&self, locale: &Locale) -> bool {
        *locale == *self.default_locale()
    }

    /// Iterate locales in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, Locale> {
        self.locales.iter()
    }

    /// Number of supported locales.
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Always `false`: a locale set holds at least one locale.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocaleSet {
    type Item = &'a Locale;
    type IntoIter = std::slice::Iter<'a, Locale>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
