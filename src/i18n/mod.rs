//! Locale negotiation subsystem.
//!
//! # Data Flow
//! ```text
//! Accept-Language: da, en-gb;q=0.8, en;q=0.7
//!     → negotiation.rs (parse, stable sort by quality)
//!     → ["da", "en-gb", "en"]
//!     → locale.rs (override? → first offered → default)
//!     → catalog.rs (optional translation lookup)
//! ```
//!
//! # Design Decisions
//! - Exact tag matching, no subtag fallback (`en-gb` does not match `en`)
//! - Never fails: missing headers and empty config resolve to the default
//! - Configuration is read on every resolution, so reloads apply immediately

pub mod catalog;
pub mod locale;
pub mod negotiation;

pub use catalog::{Catalog, MemoryCatalog};
pub use locale::{LocaleNegotiation, LocaleResolver};
pub use negotiation::{accepted_languages, parse_preferences, LanguagePreference};
