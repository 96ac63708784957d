//! `Accept-Language` parsing.
//!
//! Entries look like `tag[;q=value]`, comma separated. Preferences are
//! ordered by descending quality; entries of equal quality keep header order.

/// Quality assumed when an entry carries no `q` parameter.
pub const DEFAULT_QUALITY: f32 = 1.0;

/// One entry of a language-preference header.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguagePreference {
    pub tag: String,
    /// Relative weight in `[0, 1]`.
    pub quality: f32,
}

impl LanguagePreference {
    fn parse(entry: &str) -> Option<Self> {
        let mut parts = entry.split(';');
        let tag = parts.next()?.trim();
        if tag.is_empty() {
            return None;
        }

        let quality = parts
            .filter_map(|param| {
                let (name, value) = param.split_once('=')?;
                name.trim().eq_ignore_ascii_case("q").then(|| parse_quality(value))
            })
            .next()
            .unwrap_or(DEFAULT_QUALITY);

        Some(Self {
            tag: tag.to_string(),
            quality,
        })
    }
}

fn parse_quality(value: &str) -> f32 {
    match value.trim().parse::<f32>() {
        Ok(q) if q.is_nan() => 0.0,
        Ok(q) => q.clamp(0.0, 1.0),
        Err(_) => 0.0,
    }
}

/// Parse a header into preferences, best first.
///
/// An absent or blank header yields no preferences.
pub fn parse_preferences(header: Option<&str>) -> Vec<LanguagePreference> {
    let Some(header) = header else {
        return Vec::new();
    };

    let mut preferences: Vec<LanguagePreference> =
        header.split(',').filter_map(LanguagePreference::parse).collect();

    // sort_by is stable: ties stay in header order
    preferences.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    preferences
}

/// Language tags from a header, best first.
pub fn accepted_languages(header: Option<&str>) -> Vec<String> {
    parse_preferences(header)
        .into_iter()
        .map(|preference| preference.tag)
        .collect()
}
