//! Binding of route path variables.

use crate::{ArgumentResolver, ArgumentValue, Converters, ParameterLocation, ResolveError};
use boreas_core::{ComponentMethodArgument, HttpRequest, ResponseHeaders, RouteAnnotation};
use std::sync::Arc;

/// Supplies `{name}` variables captured from the request path.
///
/// An argument is supported when the method's [`RouteAnnotation`] declares
/// a path variable with the argument's name. The captured text is decoded
/// with the shared [`Converters`].
#[derive(Debug, Clone)]
pub struct PathVariableArgumentResolver {
    converters: Arc<Converters>,
}

impl PathVariableArgumentResolver {
    /// Creates a resolver decoding values with `converters`.
    #[must_use]
    pub fn new(converters: Arc<Converters>) -> Self {
        Self { converters }
    }
}

impl ArgumentResolver for PathVariableArgumentResolver {
    fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
        argument
            .method()
            .annotations()
            .get_one_or_none::<RouteAnnotation>()
            .is_some_and(|route| route.template().has_path_variable(argument.name()))
    }

    fn resolve_argument(
        &self,
        argument: &ComponentMethodArgument,
        request: &HttpRequest,
        _response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError> {
        let value = request
            .path_params()
            .get(argument.name())
            .ok_or_else(|| ResolveError::MissingParameter {
                location: ParameterLocation::Path,
                name: argument.name().to_string(),
            })?;

        self.converters
            .convert_text(&[value.to_string()], argument.type_())
            .map_err(|source| ResolveError::InvalidParameter {
                location: ParameterLocation::Path,
                name: argument.name().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boreas_core::ComponentMethod;
    use http::{Method, StatusCode};

    fn resolver() -> PathVariableArgumentResolver {
        PathVariableArgumentResolver::new(Arc::new(Converters::with_defaults()))
    }

    fn get_user() -> ComponentMethod {
        ComponentMethod::builder("get_user")
            .argument::<u64>("user_id")
            .argument::<String>("tab")
            .argument::<u64>("page")
            .annotate(RouteAnnotation::new(Method::GET, "/users/{user_id}/{tab}{?page}"))
            .unwrap()
            .build()
    }

    #[test]
    fn test_supports_declared_path_variables_only() {
        let method = get_user();
        let resolver = resolver();

        assert!(resolver.is_supported(method.get_argument("user_id").unwrap()));
        assert!(resolver.is_supported(method.get_argument("tab").unwrap()));
        assert!(!resolver.is_supported(method.get_argument("page").unwrap()));
    }

    #[test]
    fn test_converts_captured_text() {
        let method = get_user();
        let request = HttpRequest::builder()
            .uri("/users/7/posts")
            .path_param("user_id", "7")
            .path_param("tab", "posts")
            .build();

        let mut headers = ResponseHeaders::new();
        let user_id = resolver()
            .resolve_argument(method.get_argument("user_id").unwrap(), &request, &mut headers)
            .unwrap();
        let tab = resolver()
            .resolve_argument(method.get_argument("tab").unwrap(), &request, &mut headers)
            .unwrap();

        assert_eq!(user_id.downcast_ref::<u64>(), Some(&7));
        assert_eq!(tab.downcast_ref::<String>().map(String::as_str), Some("posts"));
    }

    #[test]
    fn test_missing_capture() {
        let method = get_user();
        let request = HttpRequest::builder().uri("/users").build();

        let err = resolver()
            .resolve_argument(method.get_argument("user_id").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required path variable \"user_id\"");
    }

    #[test]
    fn test_invalid_capture() {
        let method = get_user();
        let request = HttpRequest::builder().path_param("user_id", "seven").build();

        let err = resolver()
            .resolve_argument(method.get_argument("user_id").unwrap(), &request, &mut ResponseHeaders::new())
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }
}
