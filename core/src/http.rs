//! The transport boundary: requests as plain data, outcomes as a tagged enum.
//!
//! # Design
//! The library never touches the network itself. It builds [`HttpRequest`]
//! values and hands them to an injected [`Transport`], which reports what
//! happened as a [`TransportOutcome`]. Classifying the outcome with an enum
//! (instead of catching transport-library exceptions) keeps the dispatch
//! logic a plain `match` and lets tests script any failure mode without I/O.

use std::sync::Arc;

/// HTTP verb for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// One HTTP request described as plain data.
///
/// For `GET` the encoded query string is already part of `url` and `body` is
/// `None`; for every other verb the JSON-encoded payload is the body and the
/// url carries no query.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
}

/// What happened when a transport sent a request.
#[derive(Debug)]
pub enum TransportOutcome {
    /// The request completed and produced this response text.
    Success(String),

    /// The request failed at the HTTP level (4xx/5xx) but the server still
    /// produced a response body. The body is usable data.
    HttpError { body: String },

    /// The server could not be reached at all, e.g. connection refused.
    /// Carries the underlying cause as text.
    ConnectionFailed(String),

    /// Any other transport failure. Passed through to the caller unchanged.
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

/// Something that can execute an [`HttpRequest`].
///
/// Implementations decide everything about how bytes move: connection
/// handling, timeouts, TLS. The library only consumes the outcome.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> TransportOutcome;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> TransportOutcome {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> TransportOutcome {
        (**self).send(request)
    }
}
