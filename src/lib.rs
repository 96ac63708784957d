//! Request-handling utilities shared by HTTP service handlers.
//!
//! - [`i18n`]: `Accept-Language` negotiation and locale resolution
//! - [`observability`]: metered, leveled logging facade with its line formatter
//! - [`http`]: host request abstraction, gzip-aware body decoding and the
//!   capability traits handlers implement
//! - [`config`]: TOML configuration, validation and hot reload

pub mod config;
pub mod http;
pub mod i18n;
pub mod observability;

pub use config::{SharedConfig, UtilsConfig};
pub use http::{AppState, GunzippedBody, Handler, HandlerError};
pub use i18n::LocaleNegotiation;
pub use observability::{Level, Log};
