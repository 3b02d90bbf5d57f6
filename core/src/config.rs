//! Base-URL configuration for the request layer.
//!
//! # Design
//! `Config` is an explicit value handed to `Dispatcher::new`, not a hidden
//! process global. Callers that want one shared configuration construct one
//! `Config` and clone it (or share the dispatcher) themselves.

/// The default base URL used by [`Config::default`].
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Where the remote REST API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }
}
