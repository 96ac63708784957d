//! Log line rendering.
//!
//! Every record becomes exactly one line:
//!
//! ```text
//! WARN: 2024-05-01T12:00:00.000Z: src/handlers/upload.rs:42: body rejected
//! ```
//!
//! The source position comes from the record's call stack. Frame 0 is always
//! the facade's own call site, so the caller is frame 1. Its path is shortened
//! against the longest directory prefix it shares with the formatter's base
//! directory.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::observability::Level;

/// Marker that ends the location part of a frame.
const METHOD_CLAUSE: &str = ":in ";

/// Marker trailing a packaged/archived base directory.
const ARCHIVE_MARKER: char = '!';

/// One log call, as handed to the formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    /// Frames in `<path>:<line>:in '<method>'` or `<path>:<line>` shape.
    pub call_stack: Vec<String>,
    pub message: String,
}

/// Renders [`LogRecord`]s and shortens source paths.
#[derive(Debug, Clone)]
pub struct LogFormatter {
    basedir: String,
}

impl Default for LogFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFormatter {
    /// Formatter whose base directory is this crate's own source root.
    pub fn new() -> Self {
        Self::with_basedir(env!("CARGO_MANIFEST_DIR"))
    }

    pub fn with_basedir(basedir: impl AsRef<str>) -> Self {
        Self {
            basedir: normalize_basedir(basedir.as_ref()),
        }
    }

    /// The reference base directory, computed once at construction.
    pub fn basedir(&self) -> &str {
        &self.basedir
    }

    /// Reduce a stack frame to `relative/path:line`.
    pub fn event_filename(&self, frame: &str) -> String {
        let location = frame
            .find(METHOD_CLAUSE)
            .map_or(frame, |idx| &frame[..idx]);

        let (path, line) = match location.rsplit_once(':') {
            Some((path, line)) if !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) => {
                (path, Some(line))
            }
            _ => (location, None),
        };

        let base = self.common_basedir(path);
        let relative = strip_components(path, &base).unwrap_or(path);

        match line {
            Some(line) => format!("{relative}:{line}"),
            None => relative.to_string(),
        }
    }

    /// Longest whole-component prefix shared by the base directory and `path`.
    ///
    /// Falls back to the base directory itself when the two share nothing
    /// beyond the filesystem root.
    pub fn common_basedir(&self, path: &str) -> String {
        let shared: Vec<&str> = self
            .basedir
            .split('/')
            .zip(path.split('/'))
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a)
            .collect();

        if shared.iter().all(|segment| segment.is_empty()) {
            return self.basedir.clone();
        }

        shared.join("/")
    }

    /// Render a record as a single newline-terminated line.
    pub fn format(&self, record: &LogRecord) -> String {
        let frame = record.call_stack.get(1).or_else(|| record.call_stack.first());
        let filename = frame.map_or_else(|| "-".to_string(), |frame| self.event_filename(frame));

        format!(
            "{}: {}: {}: {}\n",
            record.level.label(),
            record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            filename,
            record.message
        )
    }
}

fn normalize_basedir(raw: &str) -> String {
    let trimmed = raw.trim_end_matches(['/', ARCHIVE_MARKER]);
    if trimmed.is_empty() && raw.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `path` with the leading components of `base` removed, if it starts with them.
fn strip_components<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(base)?;
    let rest = if base.ends_with('/') {
        rest
    } else {
        rest.strip_prefix('/')?
    };
    (!rest.is_empty()).then_some(rest)
}
