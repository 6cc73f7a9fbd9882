//! Response headers collected while a request is prepared.

use http::header::{HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue};
use http::HeaderMap;
use thiserror::Error;

/// Error returned when a header name or value is not valid HTTP.
#[derive(Error, Debug)]
pub enum InvalidHeader {
    /// The header name is invalid.
    #[error("invalid header name: {0}")]
    Name(#[from] InvalidHeaderName),
    /// The header value is invalid.
    #[error("invalid header value: {0}")]
    Value(#[from] InvalidHeaderValue),
}

/// Mutable collection of headers destined for the response.
///
/// Resolvers and interceptors receive it mutably so that headers depending
/// on resolved input can be set before the controller runs.
///
/// # Example
///
/// ```rust
/// use boreas_core::ResponseHeaders;
///
/// let mut headers = ResponseHeaders::new();
/// headers.insert("x-total-count", "42").unwrap();
/// headers.append("vary", "accept").unwrap();
/// headers.append("vary", "origin").unwrap();
///
/// assert_eq!(headers.get("x-total-count"), Some("42"));
/// assert_eq!(headers.get_all("vary"), vec!["accept", "origin"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseHeaders {
    headers: HeaderMap,
}

impl ResponseHeaders {
    /// Creates an empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing existing values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHeader`] if the name or value is not valid HTTP.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<(), InvalidHeader> {
        let (name, value) = parse_pair(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Adds a header value, keeping existing values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHeader`] if the name or value is not valid HTTP.
    pub fn append(&mut self, name: &str, value: &str) -> Result<(), InvalidHeader> {
        let (name, value) = parse_pair(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Returns the first value of a header as a string.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns every value of a header as strings.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Removes a header, returning `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.headers.remove(name).is_some()
    }

    /// Returns `true` if no header is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Returns the underlying header map.
    #[must_use]
    pub fn as_header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Consumes the collection and returns the header map.
    #[must_use]
    pub fn into_header_map(self) -> HeaderMap {
        self.headers
    }
}

fn parse_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), InvalidHeader> {
    let name = HeaderName::from_bytes(name.as_bytes())?;
    let value = HeaderValue::from_str(value)?;
    Ok((name, value))
}
