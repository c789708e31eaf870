//! Locale persistence on the outgoing response.

use crate::locale::Locale;

/// Desired state of the locale response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleHeader {
    /// Set (or overwrite) the header to this locale.
    Set(Locale),
    /// Remove the header.
    Remove,
}

/// Mutations to apply to a response so the next request can skip negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Locale to write to the locale cookie, when it changed.
    pub set_cookie: Option<Locale>,
    /// Locale response header.
    pub header: LocaleHeader,
}

impl SessionUpdate {
    /// Compare the resolved locale with the incoming cookie value.
    ///
    /// The cookie is written only when the values differ (a missing cookie
    /// always differs). The header is always set when a locale was resolved
    /// and removed otherwise.
    pub fn compute(incoming_cookie: Option<&str>, resolved: Option<&Locale>) -> Self {
        let Some(locale) = resolved else {
            return Self {
                set_cookie: None,
                header: LocaleHeader::Remove,
            };
        };

        let set_cookie = (incoming_cookie != Some(locale.as_str())).then(|| locale.clone());
        Self {
            set_cookie,
            header: LocaleHeader::Set(locale.clone()),
        }
    }
}
