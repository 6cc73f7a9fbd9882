//! Error types owned by the core data model.

use thiserror::Error;

/// Failure to parse a request body into structured data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// The body is not valid for its declared content type.
    #[error("malformed {content_type} body: {message}")]
    Malformed {
        /// Content type the body was parsed as.
        content_type: &'static str,
        /// Parser message.
        message: String,
    },

    /// The content type has no body parser.
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),
}

/// A method was annotated twice with conflicting annotations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot annotate twice: {annotation}")]
pub struct AlreadyAnnotated {
    /// Readable name of the annotation type.
    pub annotation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_error_display() {
        let err = BodyError::Malformed {
            content_type: "json",
            message: "EOF while parsing".to_string(),
        };
        assert_eq!(err.to_string(), "malformed json body: EOF while parsing");

        let err = BodyError::UnsupportedMediaType("text/csv".to_string());
        assert_eq!(err.to_string(), "unsupported content type: text/csv");
    }

    #[test]
    fn test_already_annotated_display() {
        let err = AlreadyAnnotated {
            annotation: "RequestBodyAnnotation".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot annotate twice: RequestBodyAnnotation");
    }
}
