//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate locale tags and the fallback locale
//! - Validate value ranges (body limits > 0, non-empty log target)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: UtilsConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::UtilsConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("i18n.default_locale must not be empty")]
    EmptyDefaultLocale,

    #[error("i18n.locales[{index}] is not a valid locale tag: {value:?}")]
    InvalidLocale { index: usize, value: String },

    #[error("logging.file must not be empty when logging is enabled")]
    EmptyLogTarget,

    #[error("body.{0} must be greater than zero")]
    ZeroBodyLimit(&'static str),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &UtilsConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.i18n.default_locale.trim().is_empty() {
        errors.push(ValidationError::EmptyDefaultLocale);
    }

    for (index, locale) in config.i18n.locales.iter().enumerate() {
        if locale.is_empty() || locale.chars().any(|c| c.is_whitespace() || c == ',' || c == ';') {
            errors.push(ValidationError::InvalidLocale {
                index,
                value: locale.clone(),
            });
        }
    }

    if config.logging.enabled && config.logging.file.trim().is_empty() {
        errors.push(ValidationError::EmptyLogTarget);
    }

    if config.body.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit("max_body_size"));
    }

    if config.body.max_decoded_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit("max_decoded_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
