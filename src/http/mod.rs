//! HTTP request utilities.
//!
//! # Data Flow
//! ```text
//! axum Request
//!     → request.rs (buffer body, build CGI-style env)
//!     → handler.rs (Handler: request + config snapshot + Log)
//!     → body.rs (gunzipped_body: passthrough | inflate | reject)
//!     → error.rs (HandlerError → status + "{}" response)
//! ```

pub mod body;
pub mod error;
pub mod handler;
pub mod request;

pub use body::{BodyDecoder, BodyOutcome, DecodedBody, GunzippedBody, Rejection};
pub use error::{HandlerError, RequestError, EMPTY_JSON_BODY};
pub use handler::{AppState, CanAbort, Handler, HasConfig, HasLog, HasRequest};
pub use request::{BufferedRequest, HostRequest, RequestBody, HTTP_ACCEPT_LANGUAGE, HTTP_CONTENT_ENCODING};
