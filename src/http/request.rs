//! Host request abstraction.
//!
//! # Responsibilities
//! - Expose request headers as a CGI-style environment (`HTTP_ACCEPT_LANGUAGE`, ...)
//! - Expose a rewindable body that can be read in full
//! - Buffer axum requests into that shape
//!
//! # Design Decisions
//! - Header names map to `HTTP_<UPPER_SNAKE>`; `Content-Type` and
//!   `Content-Length` map to `CONTENT_TYPE` / `CONTENT_LENGTH`
//! - Repeated headers are joined with `", "`
//! - Bodies are buffered up front, bounded by `body.max_body_size`; going over
//!   the bound is reported as [`RequestError::TooLarge`], not as a transport error

use std::collections::HashMap;
use std::error::Error as StdError;
use std::io::{self, Cursor, Read, Seek};

use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Request};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::request::Parts;
use http_body_util::LengthLimitError;

use crate::http::error::{HandlerError, RequestError};

pub const HTTP_ACCEPT_LANGUAGE: &str = "HTTP_ACCEPT_LANGUAGE";
pub const HTTP_CONTENT_ENCODING: &str = "HTTP_CONTENT_ENCODING";

/// Body limit used when no configuration is at hand.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// A request body that can be rewound and read to the end.
pub trait RequestBody {
    fn rewind(&mut self) -> io::Result<()>;

    fn read_all(&mut self) -> io::Result<Vec<u8>>;
}

impl<T: Read + Seek> RequestBody for T {
    fn rewind(&mut self) -> io::Result<()> {
        Seek::rewind(self)
    }

    fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// The raw request as seen by the utilities.
pub trait HostRequest {
    /// Environment entry, e.g. `env("HTTP_CONTENT_ENCODING")`.
    fn env(&self, key: &str) -> Option<&str>;

    fn body(&mut self) -> &mut dyn RequestBody;
}

/// A fully buffered request.
#[derive(Debug, Clone, Default)]
pub struct BufferedRequest {
    env: HashMap<String, String>,
    body: Cursor<Bytes>,
}

impl BufferedRequest {
    pub fn new(env: HashMap<String, String>, body: impl Into<Bytes>) -> Self {
        Self {
            env,
            body: Cursor::new(body.into()),
        }
    }

    /// Build the environment from request parts.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let mut env = HashMap::new();
        env.insert("REQUEST_METHOD".to_string(), parts.method.to_string());
        env.insert("PATH_INFO".to_string(), parts.uri.path().to_string());
        env.insert(
            "QUERY_STRING".to_string(),
            parts.uri.query().unwrap_or_default().to_string(),
        );
        env.insert("SERVER_PROTOCOL".to_string(), format!("{:?}", parts.version));

        for (name, value) in parts.headers.iter() {
            let Ok(value) = value.to_str() else {
                tracing::debug!(header = %name, "Skipping non-visible-ASCII header value");
                continue;
            };

            let key = if name == CONTENT_TYPE {
                "CONTENT_TYPE".to_string()
            } else if name == CONTENT_LENGTH {
                "CONTENT_LENGTH".to_string()
            } else {
                format!("HTTP_{}", name.as_str().to_ascii_uppercase().replace('-', "_"))
            };

            env.entry(key)
                .and_modify(|existing: &mut String| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        Self::new(env, body)
    }

    /// Buffer an axum request, reading at most `limit` body bytes.
    pub async fn from_axum(request: Request<Body>, limit: usize) -> Result<Self, RequestError> {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
            if exceeds_limit(&err) {
                RequestError::TooLarge { limit }
            } else {
                RequestError::Buffer(err)
            }
        })?;
        Ok(Self::from_parts(&parts, bytes))
    }

    pub fn env_map(&self) -> &HashMap<String, String> {
        &self.env
    }
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(err) = current {
        if err.is::<LengthLimitError>() {
            return true;
        }
        current = err.source();
    }
    false
}

impl HostRequest for BufferedRequest {
    fn env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    fn body(&mut self) -> &mut dyn RequestBody {
        &mut self.body
    }
}

impl<S: Send + Sync> FromRequest<S> for BufferedRequest {
    type Rejection = HandlerError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_axum(req, DEFAULT_BODY_LIMIT).await?)
    }
}
