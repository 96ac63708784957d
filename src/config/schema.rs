//! Configuration schema definitions.
//!
//! This module defines the runtime configuration read by the request
//! utilities. All types derive Serde traits for deserialization from config
//! files, and every section falls back to its defaults when omitted.

use serde::{Deserialize, Serialize};

use crate::observability::Level;

/// Target value that routes the log sink to standard output.
pub const STDOUT_TARGET: &str = "STDOUT";

/// Root configuration for the request utilities.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct UtilsConfig {
    /// Log sink settings.
    pub logging: LoggingConfig,

    /// Counter emission settings.
    pub statsd: StatsdConfig,

    /// Locale negotiation settings.
    pub i18n: I18nConfig,

    /// Request body limits.
    pub body: BodyConfig,
}

/// Log sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write log lines at all.
    pub enabled: bool,

    /// `"STDOUT"` for the console, anything else is a file path to append to.
    pub file: String,

    /// Minimum severity the sink writes.
    pub level: Level,

    /// Overrides the base directory used to shorten source paths.
    pub basedir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: STDOUT_TARGET.to_string(),
            level: Level::Debug,
            basedir: None,
        }
    }
}

impl LoggingConfig {
    /// Returns true when the sink should write to standard output.
    pub fn is_stdout(&self) -> bool {
        self.file == STDOUT_TARGET
    }
}

/// Counter emission configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct StatsdConfig {
    /// Levels that do not bump their `log.<level>` counter.
    pub exclude_levels: Vec<Level>,
}

impl StatsdConfig {
    pub fn is_excluded(&self, level: Level) -> bool {
        self.exclude_levels.contains(&level)
    }
}

/// Locale negotiation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct I18nConfig {
    /// Locales the service can answer in. Empty means "always the default".
    pub locales: Vec<String>,

    /// Locale used when nothing the client accepts is available.
    pub default_locale: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: Vec::new(),
            default_locale: "en".to_string(),
        }
    }
}

/// Request body configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Maximum size in bytes of a request body as received.
    pub max_body_size: usize,

    /// Maximum size in bytes of a decompressed request body.
    pub max_decoded_size: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
            max_decoded_size: 10 * 1024 * 1024, // 10MB
        }
    }
}
