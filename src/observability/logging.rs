//! Leveled, metered logging facade.
//!
//! # Responsibilities
//! - Own the single log sink of a service and build it on first use
//! - Count every call per level, unless the level is excluded
//! - Render records through [`LogFormatter`] and forward them to the sink
//!
//! # Design Decisions
//! - One `Log` per process, shared by `Arc` instead of looked up globally
//! - The sink is built lazily, at most once, even under concurrent first use
//! - `statsd.exclude_levels` only silences counters, never the write itself
//! - A completion closure runs exactly once, independently of the level gate
//! - Sink failures are returned to the caller, not swallowed

use std::fmt;
use std::panic::Location;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::Utc;

use crate::config::{LoggingConfig, StatsdConfig, UtilsConfig};
use crate::observability::formatter::{LogFormatter, LogRecord};
use crate::observability::metrics::{CounterSink, MetricsCounter};
use crate::observability::sink::{self, LogError, LogSink};
use crate::observability::Level;

/// Shared logging service.
pub struct Log {
    logging: LoggingConfig,
    statsd: StatsdConfig,
    formatter: LogFormatter,
    counter: Arc<dyn CounterSink>,
    sink: OnceLock<Box<dyn LogSink>>,
    init: Mutex<()>,
}

impl fmt::Debug for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Log")
            .field("target", &self.logging.file)
            .field("exclude_levels", &self.statsd.exclude_levels)
            .field("basedir", &self.formatter.basedir())
            .field("sink", &self.sink.get())
            .finish()
    }
}

macro_rules! leveled {
    ($level:expr, $plain:ident, $with:ident, $query:ident) => {
        #[doc = concat!("Write `message` at ", stringify!($plain), " level.")]
        #[track_caller]
        pub fn $plain(&self, message: impl fmt::Display) -> Result<(), LogError> {
            self.dispatch($level, &message, Location::caller())
        }

        #[doc = concat!("Write `message` at ", stringify!($plain), " level, then run `block` exactly once.")]
        #[track_caller]
        pub fn $with<F: FnOnce()>(&self, message: impl fmt::Display, block: F) -> Result<(), LogError> {
            self.log_with($level, message, block)
        }

        #[doc = concat!("Whether the sink writes ", stringify!($plain), " records.")]
        pub fn $query(&self) -> bool {
            self.enabled($level)
        }
    };
}

impl Log {
    /// Facade counting through the global `metrics` recorder.
    pub fn new(config: &UtilsConfig) -> Self {
        Self::with_counter(config, Arc::new(MetricsCounter))
    }

    pub fn with_counter(config: &UtilsConfig, counter: Arc<dyn CounterSink>) -> Self {
        let formatter = match &config.logging.basedir {
            Some(basedir) => LogFormatter::with_basedir(basedir),
            None => LogFormatter::new(),
        };

        Self {
            logging: config.logging.clone(),
            statsd: config.statsd.clone(),
            formatter,
            counter,
            sink: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Facade writing to a caller-supplied sink instead of the configured one.
    pub fn with_sink(
        config: &UtilsConfig,
        counter: Arc<dyn CounterSink>,
        sink: Box<dyn LogSink>,
    ) -> Self {
        let log = Self::with_counter(config, counter);
        let _ = log.sink.set(sink);
        log
    }

    pub fn formatter(&self) -> &LogFormatter {
        &self.formatter
    }

    /// The sink, built from the logging section on first call.
    pub fn sink(&self) -> Result<&dyn LogSink, LogError> {
        if let Some(sink) = self.sink.get() {
            return Ok(sink.as_ref());
        }

        let _guard = self.init.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(sink) = self.sink.get() {
            return Ok(sink.as_ref());
        }

        let built = sink::build_sink(&self.logging)?;
        tracing::debug!(destination = %built.destination(), "Log sink initialized");
        Ok(self.sink.get_or_init(|| built).as_ref())
    }

    /// Whether the sink writes records at `level`.
    ///
    /// Answers from configuration until the sink exists, so it never fails.
    pub fn enabled(&self, level: Level) -> bool {
        match self.sink.get() {
            Some(sink) => sink.enabled(level),
            None => sink::configured_threshold(&self.logging).is_some_and(|min| level >= min),
        }
    }

    /// Write `message` at `level`.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl fmt::Display) -> Result<(), LogError> {
        self.dispatch(level, &message, Location::caller())
    }

    /// Write `message` at `level`, then run `block` exactly once whatever the outcome.
    #[track_caller]
    pub fn log_with<F: FnOnce()>(
        &self,
        level: Level,
        message: impl fmt::Display,
        block: F,
    ) -> Result<(), LogError> {
        let result = self.dispatch(level, &message, Location::caller());
        block();
        result
    }

    leveled!(Level::Debug, debug, debug_with, is_debug);
    leveled!(Level::Info, info, info_with, is_info);
    leveled!(Level::Warn, warn, warn_with, is_warn);
    leveled!(Level::Error, error, error_with, is_error);
    leveled!(Level::Fatal, fatal, fatal_with, is_fatal);

    fn dispatch(
        &self,
        level: Level,
        message: &dyn fmt::Display,
        caller: &Location<'_>,
    ) -> Result<(), LogError> {
        if !self.statsd.is_excluded(level) {
            self.counter.increment(level.counter_name());
        }

        let sink = self.sink()?;
        if !sink.enabled(level) {
            return Ok(());
        }

        let record = LogRecord {
            level,
            timestamp: Utc::now(),
            call_stack: vec![
                format!("{}:{}:in '{}'", file!(), line!(), level.as_str()),
                format!("{}:{}", caller.file(), caller.line()),
            ],
            message: message.to_string(),
        };

        sink.write_line(level, &self.formatter.format(&record))?;
        Ok(())
    }
}
