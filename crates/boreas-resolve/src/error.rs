//! Resolution error types.

use boreas_core::BodyError;
use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Where a named request parameter was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    /// A `{name}` variable of the route path.
    Path,
    /// A query string parameter.
    Query,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path variable"),
            Self::Query => write!(f, "query parameter"),
        }
    }
}

/// Failure to turn request data into a value of the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// No decoder is registered for the target type.
    #[error("no converter registered for {type_name}")]
    NoConverter {
        /// Readable name of the target type.
        type_name: String,
    },

    /// The input does not decode into the target type.
    #[error("cannot convert to {type_name}: {message}")]
    Decode {
        /// Readable name of the target type.
        type_name: String,
        /// Decoder message.
        message: String,
    },
}

/// Error produced while resolving a controller argument.
///
/// # Example
///
/// ```rust
/// use boreas_resolve::ResolveError;
/// use http::StatusCode;
///
/// let err = ResolveError::ArgumentNotSupported {
///     name: "payload".to_string(),
///     type_name: "UserDto".to_string(),
/// };
/// assert_eq!(err.to_string(), "Unable to resolve argument payload: UserDto");
/// assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
/// ```
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No registered resolver supports the argument.
    #[error("Unable to resolve argument {name}: {type_name}")]
    ArgumentNotSupported {
        /// Argument name.
        name: String,
        /// Readable name of the declared type.
        type_name: String,
    },

    /// A required parameter is absent from the request.
    #[error("Missing required {location} \"{name}\"")]
    MissingParameter {
        /// Where the parameter was expected.
        location: ParameterLocation,
        /// Parameter name.
        name: String,
    },

    /// A parameter is present but does not convert to the declared type.
    #[error("Invalid {location} \"{name}\": {source}")]
    InvalidParameter {
        /// Where the parameter was found.
        location: ParameterLocation,
        /// Parameter name.
        name: String,
        /// Underlying conversion failure.
        source: ConversionError,
    },

    /// The request body does not convert to the declared type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The request body could not be parsed.
    #[error("Invalid request body: {0}")]
    Body(#[from] BodyError),

    /// The request body exceeds the configured limit.
    #[error("payload too large: max {limit} bytes, got {actual} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes.
        limit: usize,
        /// Actual body size in bytes.
        actual: usize,
    },

    /// Failure raised by an application-provided resolver.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl ResolveError {
    /// Creates an error for an argument no resolver supports.
    #[must_use]
    pub fn not_supported(argument: &boreas_core::ComponentMethodArgument) -> Self {
        Self::ArgumentNotSupported {
            name: argument.name().to_string(),
            type_name: argument.type_().readable_name(),
        }
    }

    /// Returns the appropriate HTTP status code for this error.
    ///
    /// Unsupported arguments and missing converters are server
    /// misconfigurations; everything caused by request data is a 4xx.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ArgumentNotSupported { .. }
            | Self::Conversion(ConversionError::NoConverter { .. })
            | Self::InvalidParameter {
                source: ConversionError::NoConverter { .. },
                ..
            }
            | Self::Custom(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingParameter { .. }
            | Self::InvalidParameter { .. }
            | Self::Conversion(ConversionError::Decode { .. })
            | Self::Body(BodyError::Malformed { .. }) => StatusCode::BAD_REQUEST,
            Self::Body(BodyError::UnsupportedMediaType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ArgumentNotSupported { .. } => "ARGUMENT_NOT_SUPPORTED",
            Self::MissingParameter { .. } => "MISSING_PARAMETER",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::Conversion(ConversionError::NoConverter { .. }) => "NO_CONVERTER",
            Self::Conversion(ConversionError::Decode { .. }) => "DESERIALIZATION_FAILED",
            Self::Body(BodyError::Malformed { .. }) => "MALFORMED_BODY",
            Self::Body(BodyError::UnsupportedMediaType(_)) => "UNSUPPORTED_MEDIA_TYPE",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::Custom(_) => "RESOLUTION_FAILED",
        }
    }
}
