//! Request interceptors.
//!
//! An [`Interceptor`] inspects a request before its controller arguments are
//! resolved. It may add response headers, or reject the request with an
//! [`InterceptorError`] carrying the status to respond with.

use boreas_core::{HttpRequest, ResponseHeaders};
use boreas_telemetry::metrics;
use http::StatusCode;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Rejection raised by an interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InterceptorError {
    status: StatusCode,
    message: String,
}

impl InterceptorError {
    /// Creates a rejection with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a `401 Unauthorized` rejection.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a `403 Forbidden` rejection.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a `400 Bad Request` rejection.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Returns the status to respond with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Returns the rejection message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.status {
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::FORBIDDEN => "FORBIDDEN",
            StatusCode::TOO_MANY_REQUESTS => "RATE_LIMITED",
            s if s.is_client_error() => "REQUEST_REJECTED",
            _ => "INTERCEPTOR_FAILED",
        }
    }
}

/// Hook that runs before argument resolution.
///
/// # Example
///
/// ```rust
/// use boreas_core::{HttpRequest, ResponseHeaders};
/// use boreas_web::{Interceptor, InterceptorError};
///
/// struct ApiVersion;
///
/// impl Interceptor for ApiVersion {
///     fn name(&self) -> &'static str {
///         "api_version"
///     }
///
///     fn pre_handle(
///         &self,
///         _request: &HttpRequest,
///         response_headers: &mut ResponseHeaders,
///     ) -> Result<(), InterceptorError> {
///         response_headers
///             .insert("x-api-version", "2")
///             .map_err(|e| InterceptorError::new(http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync + 'static {
    /// Returns the name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Inspects `request` before its arguments are resolved.
    ///
    /// Returning an error stops the request; later interceptors do not run.
    fn pre_handle(
        &self,
        request: &HttpRequest,
        response_headers: &mut ResponseHeaders,
    ) -> Result<(), InterceptorError>;
}

/// Ordered set of interceptors.
#[derive(Clone, Default)]
pub struct InterceptorRegistry {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interceptor. Interceptors run in the order they are added.
    pub fn add_interceptor<I: Interceptor>(&mut self, interceptor: I) -> &mut Self {
        tracing::debug!(interceptor = interceptor.name(), "Interceptor registered");
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Returns the registered interceptor names in run order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.interceptors.iter().map(|i| i.name())
    }

    /// Returns the number of registered interceptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Returns `true` if no interceptor is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Runs every interceptor in order, stopping at the first rejection.
    pub fn pre_handle(
        &self,
        request: &HttpRequest,
        response_headers: &mut ResponseHeaders,
    ) -> Result<(), InterceptorError> {
        for interceptor in &self.interceptors {
            if let Err(e) = interceptor.pre_handle(request, response_headers) {
                tracing::warn!(
                    interceptor = interceptor.name(),
                    status = e.status_code().as_u16(),
                    path = request.path(),
                    error = %e,
                    "Request rejected by interceptor"
                );
                metrics::record_interceptor_rejection(interceptor.name());
                return Err(e);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Rejects requests that lack a header.
#[derive(Debug, Clone)]
pub struct RequireHeader {
    header: String,
    status: StatusCode,
}

impl RequireHeader {
    /// Requires `header`, rejecting with `401 Unauthorized` when absent.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    /// Sets the status used for rejections.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl Interceptor for RequireHeader {
    fn name(&self) -> &'static str {
        "require_header"
    }

    fn pre_handle(
        &self,
        request: &HttpRequest,
        _response_headers: &mut ResponseHeaders,
    ) -> Result<(), InterceptorError> {
        match request.header(&self.header) {
            Some(_) => Ok(()),
            None => Err(InterceptorError::new(
                self.status,
                format!("missing required header: {}", self.header),
            )),
        }
    }
}
