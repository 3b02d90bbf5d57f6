//! Request dispatch: verb + path segments + payload in, decoded JSON out.
//!
//! # Design
//! `Dispatcher` owns a [`Config`] and an injected [`Transport`]. It builds
//! the target URL, shapes the payload (query parameters for `GET`, a JSON
//! body for everything else), sends the request, and classifies the outcome
//! with a single `match`. An HTTP-level failure that still produced a body is
//! decoded like any success; only an unreachable server or an undecodable
//! response becomes a typed error.

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::http::{HttpMethod, HttpRequest, Transport, TransportOutcome};
use crate::url;

/// Ordered, string-keyed attribute map — the JSON-object currency of the
/// whole crate. Field order from the server is preserved.
pub type Attributes = Map<String, Value>;

/// Sends requests through an injected transport and decodes the responses.
#[derive(Debug)]
pub struct Dispatcher<T: Transport> {
    config: Config,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Send one request and return the decoded JSON response.
    ///
    /// `None` segments fail with [`Error::Path`] before any network
    /// activity. The decoded value is returned as-is — object, array, or
    /// scalar — with no shape assertion at this layer.
    pub fn request(
        &self,
        method: HttpMethod,
        segments: &[Option<&str>],
        params: &Attributes,
    ) -> Result<Value, Error> {
        let mut target = url::build_url(self.config.base_url(), segments)?;
        let body = if method == HttpMethod::Get {
            if !params.is_empty() {
                let pairs: Vec<(String, String)> = params
                    .iter()
                    .map(|(key, value)| (key.clone(), query_value(value)))
                    .collect();
                target.push('?');
                target.push_str(&url::build_query(&pairs));
            }
            None
        } else {
            Some(Value::Object(params.clone()).to_string())
        };

        let request = HttpRequest {
            method,
            url: target.clone(),
            body,
        };
        debug!(method = ?request.method, url = %request.url, "sending request");

        let text = match self.transport.send(&request) {
            TransportOutcome::Success(text) => text,
            // A server-produced error body is still usable data.
            TransportOutcome::HttpError { body } => body,
            TransportOutcome::ConnectionFailed(cause) => {
                return Err(Error::Connection {
                    url: target,
                    cause,
                })
            }
            TransportOutcome::Failed(e) => return Err(Error::Transport(e)),
        };

        serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, "response was not valid JSON");
            Error::json_parse(e.to_string(), text)
        })
    }

    /// `GET` a path whose response must decode to a JSON object.
    pub fn get_object(
        &self,
        segments: &[Option<&str>],
        params: &Attributes,
    ) -> Result<Attributes, Error> {
        match self.request(HttpMethod::Get, segments, params)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::json_parse("expected a JSON object", other.to_string())),
        }
    }

    /// `GET` a path whose response must decode to a JSON array of objects.
    /// Elements come back in their original order.
    pub fn get_list(
        &self,
        segments: &[Option<&str>],
        params: &Attributes,
    ) -> Result<Vec<Attributes>, Error> {
        match self.request(HttpMethod::Get, segments, params)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(Error::json_parse(
                        "expected a JSON object in the array",
                        other.to_string(),
                    )),
                })
                .collect(),
            other => Err(Error::json_parse("expected a JSON array", other.to_string())),
        }
    }
}

/// Render a JSON value as a query-parameter value: strings go bare, anything
/// else keeps its JSON rendering.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
