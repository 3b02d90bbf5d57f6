//! URL construction from a base URL and escaped path segments.
//!
//! # Design
//! Every path segment is percent-escaped individually, so a `/` appearing
//! *inside* a segment becomes `%2F` — only the joiner inserts literal
//! slashes. Escaping covers everything outside the unreserved set
//! (`A-Z a-z 0-9 - _ . ~`). Pure functions, no I/O.

use std::borrow::Cow;

use crate::error::Error;

/// Percent-escape every character outside the URI unreserved set.
pub fn escape(text: &str) -> Cow<'_, str> {
    urlencoding::encode(text)
}

/// Join `base` and the escaped `segments` into a full URL.
///
/// Strips exactly one trailing `/` from `base`. A `None` segment is invalid
/// and fails with [`Error::Path`] before anything is built.
pub fn build_url(base: &str, segments: &[Option<&str>]) -> Result<String, Error> {
    if let Some(position) = segments.iter().position(Option::is_none) {
        return Err(Error::Path(format!(
            "segment {position} of the request path is missing"
        )));
    }
    let base = base.strip_suffix('/').unwrap_or(base);
    let joined = segments
        .iter()
        .flatten()
        .map(|segment| escape(segment))
        .collect::<Vec<_>>()
        .join("/");
    Ok(format!("{base}/{joined}"))
}

/// Encode `pairs` as a query string, escaping keys and values alike.
pub fn build_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key), escape(value)))
        .collect::<Vec<_>>()
        .join("&")
}
