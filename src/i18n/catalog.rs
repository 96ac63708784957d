//! Translation lookup.

use std::collections::HashMap;

use serde::Deserialize;

/// Source of translated strings.
pub trait Catalog {
    fn lookup(&self, locale: &str, key: &str) -> Option<String>;
}

/// In-memory catalog keyed by locale, then message key.
///
/// Deserializes from a table per locale:
///
/// ```toml
/// [en]
/// greeting = "Hello"
///
/// [da]
/// greeting = "Hej"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MemoryCatalog {
    entries: HashMap<String, HashMap<String, String>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.entries
            .entry(locale.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, locale: &str, key: &str) -> Option<String> {
        self.entries.get(locale)?.get(key).cloned()
    }
}
