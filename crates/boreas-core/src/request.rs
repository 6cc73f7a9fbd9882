//! The framework-native HTTP request.
//!
//! [`HttpRequest`] wraps the parts of an `http::Request` together with the
//! buffered body and the path variables captured by the router. It is cheap
//! to clone: clones share one allocation, so a resolver that hands the
//! request to a controller hands over the very same request
//! (see [`HttpRequest::ptr_eq`]).
//!
//! Query parameters and the parsed body are decoded lazily on first access
//! and memoized for the lifetime of the request.

use crate::{BodyError, Params};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Inbound HTTP request as seen by argument resolvers.
///
/// # Example
///
/// ```rust
/// use boreas_core::HttpRequest;
/// use http::Method;
///
/// let request = HttpRequest::builder()
///     .method(Method::POST)
///     .uri("/users?notify=true")
///     .header("content-type", "application/json")
///     .body(r#"{"id": 1}"#)
///     .build();
///
/// assert_eq!(request.path(), "/users");
/// assert_eq!(request.query().get("notify"), Some("true"));
/// assert_eq!(request.data().unwrap()["id"], 1);
///
/// let same = request.clone();
/// assert!(HttpRequest::ptr_eq(&request, &same));
/// ```
#[derive(Clone)]
pub struct HttpRequest {
    inner: Arc<RequestInner>,
}

struct RequestInner {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    query: OnceLock<Params>,
    data: OnceLock<Result<Value, BodyError>>,
}

impl HttpRequest {
    /// Creates a request from its parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes, path_params: Params) -> Self {
        Self {
            inner: Arc::new(RequestInner {
                method,
                uri,
                headers,
                body,
                path_params,
                query: OnceLock::new(),
                data: OnceLock::new(),
            }),
        }
    }

    /// Creates a request from an `http::Request` with a buffered body.
    #[must_use]
    pub fn from_http(request: http::Request<Bytes>, path_params: Params) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body, path_params)
    }

    /// Returns a builder, mostly useful in tests.
    #[must_use]
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::new()
    }

    /// Returns `true` if both handles refer to the same request.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.inner.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.inner.uri.path()
    }

    /// Returns the raw query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.inner.uri.query()
    }

    /// Returns the decoded query parameters.
    #[must_use]
    pub fn query(&self) -> &Params {
        self.inner
            .query
            .get_or_init(|| self.query_string().map(Params::from_query).unwrap_or_default())
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.inner.body
    }

    /// Returns the path variables captured by the router.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.inner.path_params
    }

    /// Returns the parsed body.
    ///
    /// JSON bodies (no content type, `application/json`, or any `+json`
    /// type) are parsed with `serde_json`. URL-encoded form bodies become an
    /// object of strings, with repeated keys collected into arrays. An empty
    /// body parses to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError`] if the body is malformed or its content type
    /// has no parser. The outcome is memoized.
    pub fn data(&self) -> Result<&Value, BodyError> {
        self.inner
            .data
            .get_or_init(|| parse_body(self.content_type(), &self.inner.body))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.inner.method)
            .field("uri", &self.inner.uri)
            .field("body_len", &self.inner.body.len())
            .finish_non_exhaustive()
    }
}

fn parse_body(content_type: Option<&str>, body: &Bytes) -> Result<Value, BodyError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }

    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match mime.as_deref() {
        None | Some("application/json") => parse_json(body),
        Some(ct) if ct.ends_with("+json") => parse_json(body),
        Some("application/x-www-form-urlencoded") => parse_form(body),
        Some(other) => Err(BodyError::UnsupportedMediaType(other.to_string())),
    }
}

fn parse_json(body: &Bytes) -> Result<Value, BodyError> {
    serde_json::from_slice(body).map_err(|e| BodyError::Malformed {
        content_type: "json",
        message: e.to_string(),
    })
}

fn parse_form(body: &Bytes) -> Result<Value, BodyError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(body).map_err(|e| BodyError::Malformed {
            content_type: "form",
            message: e.to_string(),
        })?;

    let mut object = Map::new();
    for (name, value) in pairs {
        match object.get_mut(&name) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                object.insert(name, Value::String(value));
            }
        }
    }
    Ok(Value::Object(object))
}

/// Builder for [`HttpRequest`].
///
/// Defaults to `GET /` with no headers and an empty body.
#[derive(Debug, Default)]
pub struct HttpRequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl HttpRequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI. An unparsable URI is ignored with a warning.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        match uri.parse() {
            Ok(uri) => self.uri = uri,
            Err(error) => tracing::warn!(uri, %error, "Ignoring invalid request URI"),
        }
        self
    }

    /// Adds a single header.
    ///
    /// An invalid header name or value is logged and ignored.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(error) => {
                tracing::warn!(header = name, %error, "Ignoring invalid header name");
                return self;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(error) => tracing::warn!(header = %name, %error, "Ignoring invalid header value"),
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a path variable.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Builds the request.
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest::new(self.method, self.uri, self.headers, self.body, self.path_params)
    }
}
