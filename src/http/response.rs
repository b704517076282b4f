//! Response construction.
//!
//! # Responsibilities
//! - Turn a resolver hit into a redirect with a `Location` header
//! - Provide the terminal handler for chain-wide misses
//!
//! # Design Decisions
//! - One configured status code for every redirect
//! - The terminal receives the original request untouched

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::FallbackConfig;

/// Redirect response to `destination`.
///
/// Destinations are opaque, but one that cannot be carried in a header
/// (control characters, non-visible bytes) yields a 500.
pub fn redirect(status: StatusCode, destination: &str) -> Response {
    match HeaderValue::from_str(destination) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            tracing::error!(destination = %destination.escape_debug(), "Destination is not a valid Location header");
            (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect destination").into_response()
        }
    }
}

/// Terminal handler: a fixed status and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    status: StatusCode,
    body: Bytes,
}

impl Fallback {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn from_config(config: &FallbackConfig) -> Self {
        let status = StatusCode::from_u16(config.status).unwrap_or(StatusCode::NOT_FOUND);
        Self::new(status, config.body.clone())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn respond(&self, request: Request<Body>) -> Response {
        tracing::trace!(method = %request.method(), uri = %request.uri(), "Fallback response");
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body.clone(),
        )
            .into_response()
    }
}

impl Default for Fallback {
    fn default() -> Self {
        Self::from_config(&FallbackConfig::default())
    }
}
