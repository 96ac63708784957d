//! Metrics collection.
//!
//! # Metrics
//! - `log.debug`, `log.info`, `log.warn`, `log.error`, `log.fatal` (counter):
//!   one increment per facade call, unless the level is listed in
//!   `statsd.exclude_levels`
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Emission is fire-and-forget: a counter can never fail a log call
//! - Exposition is left to whichever `metrics` recorder the host installs

/// Destination for counter increments.
///
/// Implementations must not block.
pub trait CounterSink: Send + Sync {
    fn increment(&self, name: &'static str);
}

/// Forwards increments to the global `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsCounter;

impl CounterSink for MetricsCounter {
    fn increment(&self, name: &'static str) {
        metrics::counter!(name).increment(1);
    }
}
