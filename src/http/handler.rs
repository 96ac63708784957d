//! Handler capabilities.
//!
//! The utilities never reach into ambient state. A handler type opts in by
//! implementing the small capability traits below; the provided-method traits
//! [`LocaleNegotiation`](crate::i18n::LocaleNegotiation) and
//! [`GunzippedBody`](crate::http::body::GunzippedBody) build on them.
//!
//! [`Handler`] is a ready-made composition usable as an axum extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequest, Request};
use axum::http::StatusCode;

use crate::config::{SharedConfig, UtilsConfig};
use crate::http::error::{HandlerError, RequestError};
use crate::http::request::{BufferedRequest, HostRequest};
use crate::i18n::LocaleNegotiation;
use crate::observability::Log;

pub trait HasRequest {
    type Request: HostRequest + ?Sized;

    fn request(&self) -> &Self::Request;

    fn request_mut(&mut self) -> &mut Self::Request;
}

pub trait HasConfig {
    /// Configuration snapshot for this request.
    fn config(&self) -> Arc<UtilsConfig>;
}

pub trait HasLog {
    fn log(&self) -> Arc<Log>;
}

/// The host's way of ending a request early.
pub trait CanAbort {
    /// Value the handler returns to stop; infrastructure failures convert into it.
    type Halt: From<RequestError>;

    fn abort(&self, status: StatusCode, body: String) -> Self::Halt;
}

/// State shared by every handler of a service.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: SharedConfig,
    pub log: Arc<Log>,
}

impl AppState {
    pub fn new(config: SharedConfig, log: Arc<Log>) -> Self {
        Self { config, log }
    }
}

/// A buffered request together with everything the utilities need.
#[derive(Debug)]
pub struct Handler<R = BufferedRequest> {
    request: R,
    config: Arc<UtilsConfig>,
    log: Arc<Log>,
    locale: Option<String>,
}

impl<R: HostRequest> Handler<R> {
    pub fn new(request: R, config: Arc<UtilsConfig>, log: Arc<Log>) -> Self {
        Self {
            request,
            config,
            log,
            locale: None,
        }
    }

    /// Snapshot the shared configuration for one request.
    pub fn from_state(request: R, state: &AppState) -> Self {
        Self::new(request, state.config.load_full(), state.log.clone())
    }

    /// Pin the locale, bypassing negotiation.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }

    pub fn into_request(self) -> R {
        self.request
    }
}

impl<R: HostRequest> HasRequest for Handler<R> {
    type Request = R;

    fn request(&self) -> &R {
        &self.request
    }

    fn request_mut(&mut self) -> &mut R {
        &mut self.request
    }
}

impl<R> HasConfig for Handler<R> {
    fn config(&self) -> Arc<UtilsConfig> {
        self.config.clone()
    }
}

impl<R> HasLog for Handler<R> {
    fn log(&self) -> Arc<Log> {
        self.log.clone()
    }
}

impl<R> CanAbort for Handler<R> {
    type Halt = HandlerError;

    fn abort(&self, status: StatusCode, body: String) -> HandlerError {
        HandlerError::halted(status, body)
    }
}

impl<R: HostRequest> LocaleNegotiation for Handler<R> {
    fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}

impl<S> FromRequest<S> for Handler
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let config = state.config.load_full();
        let request = BufferedRequest::from_axum(req, config.body.max_body_size).await?;
        Ok(Self::new(request, config, state.log))
    }
}
