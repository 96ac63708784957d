//! Shared utilities for integration tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use request_utils::observability::{CounterSink, Level, LogSink};
use request_utils::{config, AppState, Log, UtilsConfig};

/// Install a test-friendly tracing subscriber once per binary.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Counter that remembers every increment.
#[derive(Default)]
pub struct RecordingCounter {
    names: Mutex<Vec<&'static str>>,
}

#[allow(dead_code)]
impl RecordingCounter {
    pub fn names(&self) -> Vec<&'static str> {
        self.names.lock().unwrap().clone()
    }
}

impl CounterSink for RecordingCounter {
    fn increment(&self, name: &'static str) {
        self.names.lock().unwrap().push(name);
    }
}

/// Sink that keeps rendered lines in memory.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for MemorySink {
    fn threshold(&self) -> Option<Level> {
        Some(Level::Debug)
    }

    fn write_line(&self, _level: Level, line: &str) -> io::Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }

    fn destination(&self) -> String {
        "memory".into()
    }
}

/// Application state whose log writes to memory.
#[allow(dead_code)]
pub fn test_state(config: UtilsConfig) -> (AppState, Arc<RecordingCounter>, MemorySink) {
    let counter = Arc::new(RecordingCounter::default());
    let sink = MemorySink::default();
    let log = Log::with_sink(&config, counter.clone(), Box::new(sink.clone()));
    (AppState::new(config::shared(config), Arc::new(log)), counter, sink)
}

#[allow(dead_code)]
pub fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[allow(dead_code)]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// POST `body` to `uri` with optional encoding and language headers.
#[allow(dead_code)]
pub fn post(uri: &str, encoding: Option<&str>, language: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(encoding) = encoding {
        builder = builder.header("Content-Encoding", encoding);
    }
    if let Some(language) = language {
        builder = builder.header("Accept-Language", language);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Collect a response body as text.
#[allow(dead_code)]
pub async fn text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
