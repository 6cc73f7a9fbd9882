//! Binding of query string parameters.

use crate::{ArgumentResolver, ArgumentValue, Converters, ParameterLocation, ResolveError};
use boreas_core::{
    ComponentMethodArgument, HttpRequest, MapQueryParameterAnnotation, ResponseHeaders,
    RouteAnnotation,
};
use serde_json::Value;
use std::sync::Arc;

/// Supplies query parameters declared by the method's route template.
///
/// An argument is supported when the [`RouteAnnotation`] template lists its
/// query name in a `{?...}` expression. The query name is the argument name,
/// unless a [`MapQueryParameterAnnotation`] maps another parameter onto the
/// argument.
///
/// Exploded parameters (`{?tag*}`) collect every repeated value; other
/// parameters use the first value, which may still hold a comma-separated
/// list. An absent parameter falls back to the argument default, then to
/// `None` for optional arguments, and is otherwise an error.
///
/// # Example
///
/// ```rust
/// use boreas_core::{ComponentMethod, HttpRequest, ResponseHeaders, RouteAnnotation};
/// use boreas_resolve::{ArgumentResolver, Converters, QueryParameterArgumentResolver};
/// use http::Method;
/// use std::sync::Arc;
///
/// let method = ComponentMethod::builder("list")
///     .argument::<Vec<i64>>("ids")
///     .annotate(RouteAnnotation::new(Method::GET, "/items{?ids*}"))
///     .unwrap()
///     .build();
/// let request = HttpRequest::builder().uri("/items?ids=1&ids=2").build();
///
/// let resolver = QueryParameterArgumentResolver::new(Arc::new(Converters::with_defaults()));
/// let value = resolver
///     .resolve_argument(method.get_argument("ids").unwrap(), &request, &mut ResponseHeaders::new())
///     .unwrap();
/// assert_eq!(value.downcast_ref::<Vec<i64>>(), Some(&vec![1, 2]));
/// ```
#[derive(Debug, Clone)]
pub struct QueryParameterArgumentResolver {
    converters: Arc<Converters>,
}

/// A query parameter bound to an argument.
struct Binding<'a> {
    name: &'a str,
    explode: bool,
}

impl QueryParameterArgumentResolver {
    /// Creates a resolver decoding values with `converters`.
    #[must_use]
    pub fn new(converters: Arc<Converters>) -> Self {
        Self { converters }
    }

    fn binding<'a>(&self, argument: &'a ComponentMethodArgument) -> Option<Binding<'a>> {
        let annotations = argument.method().annotations();
        let route = annotations.get_one_or_none::<RouteAnnotation>()?;

        let name = annotations
            .get::<MapQueryParameterAnnotation>()
            .find(|mapping| mapping.map_to() == argument.name())
            .map_or(argument.name(), MapQueryParameterAnnotation::name);

        let variable = route.template().query_variable(name)?;
        Some(Binding {
            name,
            explode: variable.is_exploded(),
        })
    }
}

impl ArgumentResolver for QueryParameterArgumentResolver {
    fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
        self.binding(argument).is_some()
    }

    fn resolve_argument(
        &self,
        argument: &ComponentMethodArgument,
        request: &HttpRequest,
        _response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError> {
        let binding = self
            .binding(argument)
            .ok_or_else(|| ResolveError::not_supported(argument))?;

        let query = request.query();
        let values: Vec<String> = if binding.explode {
            query.get_all(binding.name).map(str::to_string).collect()
        } else {
            query.get(binding.name).map(str::to_string).into_iter().collect()
        };

        if values.is_empty() {
            return if let Some(default) = argument.default() {
                Ok(self.converters.convert(default.clone(), argument.type_())?)
            } else if argument.is_optional() {
                Ok(self.converters.convert(Value::Null, argument.type_())?)
            } else {
                Err(ResolveError::MissingParameter {
                    location: ParameterLocation::Query,
                    name: binding.name.to_string(),
                })
            };
        }

        self.converters
            .convert_text(&values, argument.type_())
            .map_err(|source| ResolveError::InvalidParameter {
                location: ParameterLocation::Query,
                name: binding.name.to_string(),
                source,
            })
    }
}
