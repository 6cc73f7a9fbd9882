//! Binding of the parsed request body.

use crate::{ArgumentResolver, ArgumentValue, Converters, ResolveError};
use boreas_core::{ComponentMethodArgument, HttpRequest, RequestBodyAnnotation, ResponseHeaders};
use std::sync::Arc;

/// Default maximum body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Supplies the parsed request body to the argument named by the method's
/// [`RequestBodyAnnotation`].
///
/// The body is parsed by [`HttpRequest::data`] and decoded into the declared
/// type with the shared [`Converters`].
///
/// # Example
///
/// ```rust
/// use boreas_core::{ComponentMethod, HttpRequest, RequestBodyAnnotation, ResponseHeaders};
/// use boreas_resolve::{ArgumentResolver, Converters, RequestBodyArgumentResolver};
/// use serde::Deserialize;
/// use std::sync::Arc;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct UserDto {
///     id: u64,
/// }
///
/// let mut converters = Converters::with_defaults();
/// converters.register::<UserDto>();
/// let resolver = RequestBodyArgumentResolver::new(Arc::new(converters));
///
/// let method = ComponentMethod::builder("create")
///     .argument::<UserDto>("payload")
///     .annotate(RequestBodyAnnotation::new("payload"))
///     .unwrap()
///     .build();
/// let argument = method.get_argument("payload").unwrap();
/// let request = HttpRequest::builder().body(r#"{"id": 1}"#).build();
///
/// let value = resolver
///     .resolve_argument(argument, &request, &mut ResponseHeaders::new())
///     .unwrap();
/// assert_eq!(value.downcast_ref::<UserDto>(), Some(&UserDto { id: 1 }));
/// ```
#[derive(Debug, Clone)]
pub struct RequestBodyArgumentResolver {
    converters: Arc<Converters>,
    max_body_bytes: usize,
}

impl RequestBodyArgumentResolver {
    /// Creates a resolver with the default body size limit.
    #[must_use]
    pub fn new(converters: Arc<Converters>) -> Self {
        Self {
            converters,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Sets the maximum accepted body size in bytes.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Returns the maximum accepted body size in bytes.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

impl ArgumentResolver for RequestBodyArgumentResolver {
    fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
        argument
            .method()
            .annotations()
            .get_one_or_none::<RequestBodyAnnotation>()
            .is_some_and(|body| body.argument_name() == argument.name())
    }

    fn resolve_argument(
        &self,
        argument: &ComponentMethodArgument,
        request: &HttpRequest,
        _response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError> {
        let actual = request.body().len();
        if actual > self.max_body_bytes {
            return Err(ResolveError::PayloadTooLarge {
                limit: self.max_body_bytes,
                actual,
            });
        }

        let data = request.data()?;
        let value = self.converters.convert(data.clone(), argument.type_())?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boreas_core::{BodyError, ComponentMethod};
    use http::StatusCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct UserDto {
        id: u64,
    }

    fn resolver() -> RequestBodyArgumentResolver {
        let mut converters = Converters::with_defaults();
        converters.register::<UserDto>();
        RequestBodyArgumentResolver::new(Arc::new(converters))
    }

    fn create_method() -> ComponentMethod {
        ComponentMethod::builder("create")
            .argument::<UserDto>("payload")
            .argument::<String>("note")
            .annotate(RequestBodyAnnotation::new("payload"))
            .unwrap()
            .build()
    }

    #[test]
    fn test_requires_matching_annotation() {
        let annotated = create_method();
        let plain = ComponentMethod::builder("create").argument::<UserDto>("payload").build();

        let resolver = resolver();
        assert!(resolver.is_supported(annotated.get_argument("payload").unwrap()));
        assert!(!resolver.is_supported(annotated.get_argument("note").unwrap()));
        assert!(!resolver.is_supported(plain.get_argument("payload").unwrap()));
    }

    #[test]
    fn test_decodes_body() {
        let method = create_method();
        let request = HttpRequest::builder()
            .header("content-type", "application/json")
            .body(r#"{"id": 42}"#)
            .build();

        let value = resolver()
            .resolve_argument(method.get_argument("payload").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap();
        assert_eq!(value.downcast_ref::<UserDto>(), Some(&UserDto { id: 42 }));
    }

    #[test]
    fn test_decodes_form_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct RenameForm {
            name: String,
        }

        let method = ComponentMethod::builder("rename")
            .argument::<RenameForm>("form")
            .annotate(RequestBodyAnnotation::new("form"))
            .unwrap()
            .build();
        let mut converters = Converters::new();
        converters.register::<RenameForm>();
        let resolver = RequestBodyArgumentResolver::new(Arc::new(converters));

        let request = HttpRequest::builder()
            .header("content-type", "application/x-www-form-urlencoded")
            .body("name=Alice")
            .build();

        let value = resolver
            .resolve_argument(method.get_argument("form").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap();
        assert_eq!(
            value.downcast_ref::<RenameForm>(),
            Some(&RenameForm {
                name: "Alice".to_string()
            })
        );
    }

    #[test]
    fn test_body_that_does_not_match_type() {
        let method = create_method();
        let request = HttpRequest::builder().body(r#"{"name": "x"}"#).build();

        let err = resolver()
            .resolve_argument(method.get_argument("payload").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap_err();
        assert!(err.to_string().contains("missing field `id`"));
        assert_eq!(err.error_code(), "DESERIALIZATION_FAILED");
    }

    #[test]
    fn test_malformed_body() {
        let method = create_method();
        let request = HttpRequest::builder().body("{").build();

        let err = resolver()
            .resolve_argument(method.get_argument("payload").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::Body(BodyError::Malformed { .. })));
    }

    #[test]
    fn test_payload_too_large() {
        let method = create_method();
        let request = HttpRequest::builder().body(r#"{"id": 1000000}"#).build();

        let err = resolver()
            .with_max_body_bytes(8)
            .resolve_argument(method.get_argument("payload").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::PayloadTooLarge { limit: 8, actual: 15 }));
    }

    #[test]
    fn test_unregistered_body_type() {
        #[derive(Debug, Deserialize)]
        struct Unregistered {}

        let method = ComponentMethod::builder("create")
            .argument::<Unregistered>("payload")
            .annotate(RequestBodyAnnotation::new("payload"))
            .unwrap()
            .build();
        let request = HttpRequest::builder().body("{}").build();

        let err = resolver()
            .resolve_argument(method.get_argument("payload").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(resolver().max_body_bytes(), DEFAULT_MAX_BODY_BYTES);
    }
}
