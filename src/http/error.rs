//! Request handling errors and their HTTP mapping.

use std::io;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::observability::LogError;

/// Body sent with every client-facing rejection.
pub const EMPTY_JSON_BODY: &str = "{}";

/// Failures that are not the client's fault and surface unchanged.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to buffer request body: {0}")]
    Buffer(#[source] axum::Error),

    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Read(#[from] io::Error),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// What a handler returns when it stops early.
#[derive(Debug)]
pub enum HandlerError {
    /// Deliberate short-circuit with a fixed status and body.
    Halted { status: StatusCode, body: String },

    Request(RequestError),
}

impl HandlerError {
    pub fn halted(status: StatusCode, body: impl Into<String>) -> Self {
        Self::Halted {
            status,
            body: body.into(),
        }
    }
}

impl From<RequestError> for HandlerError {
    fn from(err: RequestError) -> Self {
        Self::Request(err)
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::Halted { status, body } => {
                (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
            }
            HandlerError::Request(err) => {
                let status = match err {
                    RequestError::Buffer(_) => StatusCode::BAD_REQUEST,
                    RequestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    RequestError::Read(_) | RequestError::Log(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                tracing::error!(error = %err, status = %status, "Request handling failed");
                (status, [(header::CONTENT_TYPE, "application/json")], EMPTY_JSON_BODY).into_response()
            }
        }
    }
}
