//! Application error types.

use boreas_config::ConfigError;
use boreas_core::di::InjectionError;
use boreas_resolve::ResolveError;
use boreas_telemetry::TelemetryError;
use boreas_web::InterceptorError;
use http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// Error raised while building an [`Application`](crate::Application).
#[derive(Debug, Error)]
pub enum BootError {
    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A configurer could not be constructed.
    #[error("configurer setup failed: {0}")]
    Injection(#[from] InjectionError),

    /// Logging or metrics could not be installed.
    #[error("telemetry setup failed: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Error raised while preparing a controller invocation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An interceptor rejected the request.
    #[error(transparent)]
    Rejected(#[from] InterceptorError),

    /// An argument could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl DispatchError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected(e) => e.status_code(),
            Self::Resolve(e) => e.status_code(),
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected(e) => e.error_code(),
            Self::Resolve(e) => e.error_code(),
        }
    }

    /// Renders the standard error envelope.
    ///
    /// Server-side failures hide their message from the client.
    ///
    /// # Example
    ///
    /// ```rust
    /// use boreas::DispatchError;
    /// use boreas::resolve::{ParameterLocation, ResolveError};
    ///
    /// let err = DispatchError::from(ResolveError::MissingParameter {
    ///     location: ParameterLocation::Query,
    ///     name: "page".to_string(),
    /// });
    ///
    /// let body = err.to_envelope();
    /// assert_eq!(body["error"]["code"], "MISSING_PARAMETER");
    /// assert_eq!(body["error"]["message"], "Missing required query parameter \"page\"");
    /// ```
    #[must_use]
    pub fn to_envelope(&self) -> Value {
        let status = self.status_code();
        let message = if status.is_server_error() {
            status.canonical_reason().unwrap_or("Internal Server Error").to_string()
        } else {
            self.to_string()
        };

        json!({
            "error": {
                "code": self.error_code(),
                "message": message,
                "status": status.as_u16(),
            }
        })
    }
}
