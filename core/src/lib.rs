//! Client-side model layer over a REST API.
//!
//! # Overview
//! Calling code declares a model as a marker type implementing [`Model`];
//! a [`ModelClient`] then translates `find` / `list` / `create` / `update` /
//! `destroy` into HTTP requests against a configured base URL, and
//! [`Instance`] carries a record's attributes, its server-reported errors,
//! and a `save` that dispatches to create-or-update.
//!
//! # Design
//! - The library never performs I/O itself: requests are plain data sent
//!   through an injected [`Transport`], which reports a [`TransportOutcome`]
//!   the dispatcher pattern-matches on.
//! - An HTTP error response that still carries a body is decoded as ordinary
//!   data, so the remote API can report business-level `errors` inside it.
//! - Per-type state (derived resource name, memoized field metadata) lives
//!   in a [`Registry`] keyed by type identity; the base URL lives in an
//!   explicit [`Config`], not a process global.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod model;
pub mod registry;
pub mod url;

pub use config::{Config, DEFAULT_BASE_URL};
pub use dispatch::{Attributes, Dispatcher};
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, Transport, TransportOutcome};
pub use model::{Instance, ModelClient};
pub use registry::{Model, Registry, RegistryEntry};
