//! Error types for the request layer.
//!
//! # Design
//! HTTP error responses (4xx/5xx) that carry a response body are not errors
//! here: the body is decoded and returned as ordinary data, so the remote API
//! can report business-level `errors` inside an error-coded response. Only
//! three situations surface as typed errors — a missing path segment, an
//! unreachable server, and an undecodable response — and anything else the
//! transport reports is passed through unmodified.

use thiserror::Error;

/// Errors returned by the dispatcher and the model operations built on it.
#[derive(Debug, Error)]
pub enum Error {
    /// A missing path segment was supplied to a request-building operation.
    /// Raised before any network activity.
    #[error("missing path segment: {0}")]
    Path(String),

    /// The transport could not reach the server at all.
    #[error("could not connect to {url}: {cause}")]
    Connection { url: String, cause: String },

    /// The response text could not be decoded as JSON, or decoded to a shape
    /// other than the one the caller asked for.
    #[error("JSON parse error: {reason}")]
    JsonParse { reason: String, text: String },

    /// Any other transport failure, passed through unmodified.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn json_parse(reason: impl Into<String>, text: impl Into<String>) -> Self {
        Error::JsonParse {
            reason: reason.into(),
            text: text.into(),
        }
    }

    /// The raw response text attached to a [`Error::JsonParse`], kept for
    /// diagnostics.
    pub fn response_text(&self) -> Option<&str> {
        match self {
            Error::JsonParse { text, .. } => Some(text),
            _ => None,
        }
    }
}
