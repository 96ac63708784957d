//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → UtilsConfig (validated, immutable)
//!     → shared via SharedConfig to all handlers
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<UtilsConfig>
//!     → next locale resolution observes new config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - The log sink reads its section once and ignores later reloads

use std::sync::Arc;

use arc_swap::ArcSwap;

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{BodyConfig, I18nConfig, LoggingConfig, StatsdConfig, UtilsConfig};
pub use validation::ValidationError;

/// Hot-swappable configuration handle shared by all handlers.
pub type SharedConfig = Arc<ArcSwap<UtilsConfig>>;

/// Wrap a configuration in a shared handle.
pub fn shared(config: UtilsConfig) -> SharedConfig {
    Arc::new(ArcSwap::from_pointee(config))
}
