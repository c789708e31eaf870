//! `Accept-Language` parsing and locale negotiation.
//!
//! Follows the quality-value rules of RFC 9110 §12.5.4: each language range
//! may carry a `q` weight in `[0, 1]` (default 1), ranges are tried in
//! descending weight, and a weight of 0 means "not acceptable".

use crate::locale::{Locale, LocaleSet, primary_subtag};

/// A single language range from an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange<'a> {
    /// Language tag as sent by the client (e.g. `pl-PL`).
    pub tag: &'a str,
    /// Quality weight.
    pub quality: f32,
}

/// Parse an `Accept-Language` header into ranges ordered by preference.
///
/// Ranges with equal weight keep their header order. Wildcards, empty tags,
/// ranges with `q=0` and ranges with an unparsable weight are dropped, so a
/// malformed header yields an empty list rather than an error.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange<'_>> {
    let mut ranges: Vec<LanguageRange<'_>> = header
        .split(',')
        .filter_map(parse_range)
        .filter(|range| range.quality > 0.0)
        .collect();

    // sort_by is stable: ties keep header order
    ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    ranges
}

fn parse_range(part: &str) -> Option<LanguageRange<'_>> {
    let mut params = part.split(';').map(str::trim);
    let tag = params.next().unwrap_or_default();
    if tag.is_empty() || tag == "*" || !is_language_tag(tag) {
        return None;
    }

    let mut quality = 1.0_f32;
    for param in params {
        let Some(value) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) else {
            continue;
        };
        match value.trim().parse::<f32>() {
            Ok(q) if (0.0..=1.0).contains(&q) => quality = q,
            _ => {
                tracing::trace!(range = part, "Dropping language range with invalid weight");
                return None;
            }
        }
    }

    Some(LanguageRange { tag, quality })
}

fn is_language_tag(tag: &str) -> bool {
    tag.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Pick the first supported locale from an `Accept-Language` header.
///
/// Ranges are visited in negotiated order. For each, an exact match wins,
/// otherwise its primary subtag is tried (`pl-PL` matches `pl`). The first
/// hit across the whole sequence is returned, so an earlier prefix match
/// beats a later exact match.
pub fn negotiate<'s>(header: &str, locales: &'s LocaleSet) -> Option<&'s Locale> {
    parse_accept_language(header).into_iter().find_map(|range| {
        locales
            .find(range.tag)
            .or_else(|| locales.find(primary_subtag(range.tag)))
    })
}
