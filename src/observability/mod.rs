//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handler calls log.warn("...")
//!     → metrics.rs (log.<level> counter, unless excluded)
//!     → logging.rs (level gate against the sink threshold)
//!     → formatter.rs (one line: LEVEL: timestamp: file:line: message)
//!     → sink.rs (stdout or append-only file)
//! ```
//!
//! # Design Decisions
//! - Counters are cheap and fire-and-forget (atomic increments)
//! - Internal diagnostics of this crate go through `tracing`; the facade
//!   is the product, with its own line format
//! - The sink is chosen once per process from the logging section

pub mod formatter;
pub mod level;
pub mod logging;
pub mod metrics;
pub mod sink;

pub use formatter::{LogFormatter, LogRecord};
pub use level::Level;
pub use logging::Log;
pub use metrics::{CounterSink, MetricsCounter};
pub use sink::{ConsoleSink, FileSink, LogError, LogSink};
