//! Log sinks: where rendered lines end up.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::config::LoggingConfig;
use crate::config::schema::STDOUT_TARGET;
use crate::observability::Level;

/// Errors raised by the logging facade.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write log line: {0}")]
    Write(#[from] io::Error),
}

/// Destination for rendered log lines.
///
/// Implementations serialize concurrent writes themselves.
pub trait LogSink: Send + Sync + fmt::Debug {
    /// Minimum level written, or `None` when the sink writes nothing.
    fn threshold(&self) -> Option<Level>;

    /// Append one already-formatted line.
    fn write_line(&self, level: Level, line: &str) -> io::Result<()>;

    /// Human-readable destination, `"STDOUT"` or a file path.
    fn destination(&self) -> String;

    fn enabled(&self, level: Level) -> bool {
        self.threshold().is_some_and(|min| level >= min)
    }
}

/// Writes to standard output.
#[derive(Debug)]
pub struct ConsoleSink {
    threshold: Option<Level>,
}

impl ConsoleSink {
    pub fn new(threshold: Option<Level>) -> Self {
        Self { threshold }
    }
}

impl LogSink for ConsoleSink {
    fn threshold(&self) -> Option<Level> {
        self.threshold
    }

    fn write_line(&self, _level: Level, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(line.as_bytes())?;
        out.flush()
    }

    fn destination(&self) -> String {
        STDOUT_TARGET.to_string()
    }
}

/// Appends to a file, creating it if needed.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    threshold: Option<Level>,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>, threshold: Option<Level>) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            threshold,
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn threshold(&self) -> Option<Level> {
        self.threshold
    }

    fn write_line(&self, _level: Level, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file mutex poisoned"))?;
        file.write_all(line.as_bytes())?;
        file.flush()
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// Minimum level implied by a logging section.
pub fn configured_threshold(config: &LoggingConfig) -> Option<Level> {
    config.enabled.then_some(config.level)
}

/// Build the sink a logging section asks for.
pub fn build_sink(config: &LoggingConfig) -> Result<Box<dyn LogSink>, LogError> {
    let threshold = configured_threshold(config);

    if !config.enabled || config.is_stdout() {
        return Ok(Box::new(ConsoleSink::new(threshold)));
    }

    Ok(Box::new(FileSink::open(&config.file, threshold)?))
}
