//! Request body decoding.
//!
//! # Responsibilities
//! - Pass bodies through untouched unless `Content-Encoding` is exactly `gzip`
//! - Inflate compressed bodies, bounded by `body.max_decoded_size`
//! - Turn undecodable bodies into a `400 {}` rejection after one warning
//!
//! # Design Decisions
//! - Rejection is a value ([`BodyOutcome::Rejected`]), not a non-local exit;
//!   [`GunzippedBody`] routes it through the host's [`CanAbort`]
//! - Payloads starting with the gzip magic are read as gzip members, anything
//!   else under the `gzip` marker as a zlib stream
//! - Oversized output is rejected with `413 {}`

use std::io::{self, Read};

use axum::body::Bytes;
use axum::http::StatusCode;
use flate2::read::{MultiGzDecoder, ZlibDecoder};

use crate::config::BodyConfig;
use crate::http::error::{RequestError, EMPTY_JSON_BODY};
use crate::http::handler::{CanAbort, HasConfig, HasLog, HasRequest};
use crate::http::request::{HostRequest, HTTP_CONTENT_ENCODING};
use crate::observability::Log;

/// The only content-encoding that triggers decompression.
pub const GZIP_ENCODING: &str = "gzip";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A request body ready for the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub bytes: Bytes,
    /// Whether the payload was inflated.
    pub decompressed: bool,
}

impl DecodedBody {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }
}

/// Client-facing refusal of a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: StatusCode,
    pub body: String,
}

impl Rejection {
    pub fn bad_request() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: EMPTY_JSON_BODY.to_string(),
        }
    }

    pub fn payload_too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            body: EMPTY_JSON_BODY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyOutcome {
    Decoded(DecodedBody),
    Rejected(Rejection),
}

#[derive(Debug)]
enum InflateError {
    Corrupt(io::Error),
    TooLarge,
}

fn inflate(raw: &[u8], limit: usize) -> Result<Vec<u8>, InflateError> {
    let decoder: Box<dyn Read + '_> = if raw.starts_with(&GZIP_MAGIC) {
        Box::new(MultiGzDecoder::new(raw))
    } else {
        Box::new(ZlibDecoder::new(raw))
    };

    let mut out = Vec::new();
    decoder
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut out)
        .map_err(InflateError::Corrupt)?;

    if out.len() > limit {
        return Err(InflateError::TooLarge);
    }
    Ok(out)
}

/// Decodes request bodies, reporting failures through the shared [`Log`].
#[derive(Debug)]
pub struct BodyDecoder<'a> {
    log: &'a Log,
    max_decoded_size: usize,
}

impl<'a> BodyDecoder<'a> {
    pub fn new(log: &'a Log, config: &BodyConfig) -> Self {
        Self {
            log,
            max_decoded_size: config.max_decoded_size,
        }
    }

    /// Read the body of `request`, inflating it when it is marked `gzip`.
    pub fn decode<R: HostRequest + ?Sized>(&self, request: &mut R) -> Result<BodyOutcome, RequestError> {
        let compressed = request.env(HTTP_CONTENT_ENCODING) == Some(GZIP_ENCODING);
        let body = request.body();

        if !compressed {
            let raw = body.read_all()?;
            return Ok(BodyOutcome::Decoded(DecodedBody {
                bytes: raw.into(),
                decompressed: false,
            }));
        }

        body.rewind()?;
        let raw = body.read_all()?;

        match inflate(&raw, self.max_decoded_size) {
            Ok(bytes) => {
                tracing::debug!(compressed = raw.len(), decoded = bytes.len(), "Inflated request body");
                Ok(BodyOutcome::Decoded(DecodedBody {
                    bytes: bytes.into(),
                    decompressed: true,
                }))
            }
            Err(InflateError::Corrupt(err)) => {
                self.log.warn(format_args!("Unable to gunzip request body: {err}"))?;
                Ok(BodyOutcome::Rejected(Rejection::bad_request()))
            }
            Err(InflateError::TooLarge) => {
                self.log.warn(format_args!(
                    "Gunzipped request body exceeds {} bytes",
                    self.max_decoded_size
                ))?;
                Ok(BodyOutcome::Rejected(Rejection::payload_too_large()))
            }
        }
    }
}

/// Body decoding for any handler with a request, a log and an abort primitive.
pub trait GunzippedBody: HasRequest + HasConfig + HasLog + CanAbort {
    /// The decoded body, or the host's halt value when the body is rejected.
    fn gunzipped_body(&mut self) -> Result<DecodedBody, Self::Halt> {
        let log = self.log();
        let config = self.config();
        let decoder = BodyDecoder::new(&log, &config.body);

        match decoder.decode(self.request_mut())? {
            BodyOutcome::Decoded(body) => Ok(body),
            BodyOutcome::Rejected(rejection) => Err(self.abort(rejection.status, rejection.body)),
        }
    }
}

impl<T: HasRequest + HasConfig + HasLog + CanAbort> GunzippedBody for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;

    use crate::config::UtilsConfig;
    use crate::http::request::BufferedRequest;
    use crate::observability::{CounterSink, Level, LogSink};

    const SAMPLE: &str = "i am groot";

    #[derive(Default)]
    struct Counter(Mutex<Vec<&'static str>>);

    impl CounterSink for Counter {
        fn increment(&self, name: &'static str) {
            self.0.lock().unwrap().push(name);
        }
    }

    #[derive(Debug, Default, Clone)]
    struct Lines(Arc<Mutex<Vec<String>>>);

    impl LogSink for Lines {
        fn threshold(&self) -> Option<Level> {
            Some(Level::Debug)
        }

        fn write_line(&self, _level: Level, line: &str) -> io::Result<()> {
            self.0.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn destination(&self) -> String {
            "memory".into()
        }
    }

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn request(encoding: Option<&str>, body: Vec<u8>) -> BufferedRequest {
        let mut env = HashMap::new();
        if let Some(encoding) = encoding {
            env.insert(HTTP_CONTENT_ENCODING.to_string(), encoding.to_string());
        }
        BufferedRequest::new(env, body)
    }

    fn log() -> (Log, Arc<Counter>, Lines) {
        let counter = Arc::new(Counter::default());
        let lines = Lines::default();
        let log = Log::with_sink(&UtilsConfig::default(), counter.clone(), Box::new(lines.clone()));
        (log, counter, lines)
    }

    fn decoded(outcome: BodyOutcome) -> DecodedBody {
        match outcome {
            BodyOutcome::Decoded(body) => body,
            BodyOutcome::Rejected(rejection) => panic!("unexpected rejection: {rejection:?}"),
        }
    }

    #[test]
    fn test_unzips_zlib_data() {
        let (log, _, _) = log();
        let decoder = BodyDecoder::new(&log, &BodyConfig::default());
        let mut req = request(Some("gzip"), zlib(SAMPLE.as_bytes()));

        let body = decoded(decoder.decode(&mut req).unwrap());
        assert_eq!(body.text().unwrap(), SAMPLE);
        assert!(body.decompressed);
    }

    #[test]
    fn test_unzips_gzip_data() {
        let (log, _, _) = log();
        let decoder = BodyDecoder::new(&log, &BodyConfig::default());
        let mut req = request(Some("gzip"), gzip(SAMPLE.as_bytes()));

        assert_eq!(decoded(decoder.decode(&mut req).unwrap()).as_bytes(), SAMPLE.as_bytes());
    }

    #[test]
    fn test_rewinds_before_reading() {
        let (log, _, _) = log();
        let decoder = BodyDecoder::new(&log, &BodyConfig::default());
        let mut req = request(Some("gzip"), zlib(SAMPLE.as_bytes()));
        req.body().read_all().unwrap();

        assert_eq!(decoded(decoder.decode(&mut req).unwrap()).text().unwrap(), SAMPLE);
    }

    #[test]
    fn test_passthrough_without_encoding() {
        let (log, counter, _) = log();
        let decoder = BodyDecoder::new(&log, &BodyConfig::default());
        let zipped = zlib(SAMPLE.as_bytes());

        for encoding in [None, Some("deflate"), Some("GZIP"), Some("gzip, br")] {
            let mut req = request(encoding, zipped.clone());
            let body = decoded(decoder.decode(&mut req).unwrap());
            assert_eq!(body.as_bytes(), &zipped[..]);
            assert!(!body.decompressed);
        }
        assert!(counter.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_bad_data_is_rejected_with_one_warning() {
        let (log, counter, lines) = log();
        let decoder = BodyDecoder::new(&log, &BodyConfig::default());
        let mut req = request(Some("gzip"), SAMPLE.as_bytes().to_vec());

        let outcome = decoder.decode(&mut req).unwrap();

        assert_eq!(outcome, BodyOutcome::Rejected(Rejection::bad_request()));
        assert_eq!(*counter.0.lock().unwrap(), vec!["log.warn"]);
        let lines = lines.0.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("WARN: "));
        assert!(lines[0].contains("Unable to gunzip request body"));
    }

    #[test]
    fn test_unbounded_limit_still_inflates() {
        let (log, counter, _) = log();
        let config = BodyConfig {
            max_decoded_size: usize::MAX,
            ..BodyConfig::default()
        };
        let decoder = BodyDecoder::new(&log, &config);

        for payload in [zlib(SAMPLE.as_bytes()), gzip(SAMPLE.as_bytes())] {
            let mut req = request(Some("gzip"), payload);
            let body = decoded(decoder.decode(&mut req).unwrap());
            assert_eq!(body.text().unwrap(), SAMPLE);
            assert!(body.decompressed);
        }
        assert!(counter.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_truncated_gzip_is_rejected() {
        let (log, _, _) = log();
        let decoder = BodyDecoder::new(&log, &BodyConfig::default());
        let zipped = gzip(SAMPLE.as_bytes());
        let mut req = request(Some("gzip"), zipped[..zipped.len() / 2].to_vec());

        let outcome = decoder.decode(&mut req).unwrap();
        assert_eq!(outcome, BodyOutcome::Rejected(Rejection::bad_request()));
    }

    #[test]
    fn test_oversized_output_is_rejected() {
        let (log, counter, _) = log();
        let config = BodyConfig {
            max_decoded_size: 4,
            ..BodyConfig::default()
        };
        let decoder = BodyDecoder::new(&log, &config);
        let mut req = request(Some("gzip"), zlib(SAMPLE.as_bytes()));

        let outcome = decoder.decode(&mut req).unwrap();
        assert_eq!(outcome, BodyOutcome::Rejected(Rejection::payload_too_large()));
        assert_eq!(*counter.0.lock().unwrap(), vec!["log.warn"]);
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let (log, _, _) = log();
        let config = BodyConfig {
            max_decoded_size: SAMPLE.len(),
            ..BodyConfig::default()
        };
        let decoder = BodyDecoder::new(&log, &config);
        let mut req = request(Some("gzip"), zlib(SAMPLE.as_bytes()));

        assert_eq!(decoded(decoder.decode(&mut req).unwrap()).text().unwrap(), SAMPLE);
    }
}
