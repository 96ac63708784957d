//! Effective locale resolution.

use crate::config::I18nConfig;
use crate::http::handler::{HasConfig, HasRequest};
use crate::http::request::{HostRequest, HTTP_ACCEPT_LANGUAGE};
use crate::i18n::catalog::Catalog;
use crate::i18n::negotiation::accepted_languages;

/// Picks a locale from an override, client preferences and configuration.
#[derive(Debug, Clone, Copy)]
pub struct LocaleResolver<'a> {
    config: &'a I18nConfig,
}

impl<'a> LocaleResolver<'a> {
    pub fn new(config: &'a I18nConfig) -> Self {
        Self { config }
    }

    /// First match wins: a non-empty override, then the best accepted locale
    /// the service offers, then the configured default.
    ///
    /// With no configured locales the default is returned without looking at
    /// `accepted`.
    pub fn resolve(&self, explicit: Option<&str>, accepted: &[String]) -> String {
        if let Some(locale) = explicit.filter(|locale| !locale.is_empty()) {
            return locale.to_string();
        }

        if self.config.locales.is_empty() {
            return self.config.default_locale.clone();
        }

        accepted
            .iter()
            .find(|tag| self.config.locales.contains(*tag))
            .cloned()
            .unwrap_or_else(|| self.config.default_locale.clone())
    }

    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }
}

/// Locale negotiation for any handler with a request and a configuration.
pub trait LocaleNegotiation: HasRequest + HasConfig {
    /// Locale already chosen for this request, if any.
    fn locale(&self) -> Option<&str> {
        None
    }

    /// Tags from `Accept-Language`, best first.
    fn accepted_languages(&self) -> Vec<String> {
        accepted_languages(self.request().env(HTTP_ACCEPT_LANGUAGE))
    }

    fn current_locale(&self) -> String {
        let config = self.config();
        LocaleResolver::new(&config.i18n).resolve(self.locale(), &self.accepted_languages())
    }

    /// Translate `key` into the current locale, falling back to the default locale.
    fn t(&self, catalog: &dyn Catalog, key: &str) -> Option<String> {
        let locale = self.current_locale();
        catalog.lookup(&locale, key).or_else(|| {
            let config = self.config();
            let fallback = &config.i18n.default_locale;
            (*fallback != locale)
                .then(|| catalog.lookup(fallback, key))
                .flatten()
        })
    }
}
