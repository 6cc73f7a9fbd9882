//! Closure-backed resolver for one argument name and type.

use crate::{ArgumentResolver, ArgumentValue, ResolveError};
use boreas_core::{ArgumentType, ComponentMethodArgument, HttpRequest, ResponseHeaders};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

type ResolveFn = dyn Fn(&ComponentMethodArgument, &HttpRequest, &mut ResponseHeaders) -> Result<ArgumentValue, ResolveError>
    + Send
    + Sync;

/// Resolves arguments with an exact name and declared type through a
/// closure.
///
/// This is the quickest way to bind application values (tenant, clock,
/// current user) without writing a resolver type.
///
/// # Example
///
/// ```rust
/// use boreas_core::{ArgumentType, ComponentMethod, HttpRequest, ResponseHeaders};
/// use boreas_resolve::{ArgumentResolver, GenericArgumentResolver};
///
/// let resolver = GenericArgumentResolver::typed::<String, _>("tenant", |_, request, _| {
///     Ok(request.header("x-tenant").unwrap_or("public").to_string())
/// });
///
/// let method = ComponentMethod::builder("list")
///     .argument::<String>("tenant")
///     .argument::<u32>("limit")
///     .build();
///
/// assert!(resolver.is_supported(method.get_argument("tenant").unwrap()));
/// assert!(!resolver.is_supported(method.get_argument("limit").unwrap()));
/// ```
pub struct GenericArgumentResolver {
    name: String,
    type_: ArgumentType,
    resolve: Box<ResolveFn>,
}

impl GenericArgumentResolver {
    /// Creates a resolver for `name: type_` producing type-erased values.
    pub fn new<F>(name: impl Into<String>, type_: ArgumentType, resolve: F) -> Self
    where
        F: Fn(&ComponentMethodArgument, &HttpRequest, &mut ResponseHeaders) -> Result<ArgumentValue, ResolveError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            type_,
            resolve: Box::new(resolve),
        }
    }

    /// Creates a resolver for `name: T` from a closure returning `T`.
    pub fn typed<T, F>(name: impl Into<String>, resolve: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&ComponentMethodArgument, &HttpRequest, &mut ResponseHeaders) -> Result<T, ResolveError>
            + Send
            + Sync
            + 'static,
    {
        Self::new(name, ArgumentType::of::<T>(), move |argument, request, headers| {
            resolve(argument, request, headers).map(|value| Arc::new(value) as ArgumentValue)
        })
    }

    /// Returns the argument name this resolver matches.
    #[must_use]
    pub fn argument_name(&self) -> &str {
        &self.name
    }

    /// Returns the argument type this resolver matches.
    #[must_use]
    pub fn argument_type(&self) -> &ArgumentType {
        &self.type_
    }
}

impl ArgumentResolver for GenericArgumentResolver {
    fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
        argument.name() == self.name && *argument.type_() == self.type_
    }

    fn resolve_argument(
        &self,
        argument: &ComponentMethodArgument,
        request: &HttpRequest,
        response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError> {
        (self.resolve)(argument, request, response_headers)
    }
}

impl fmt::Debug for GenericArgumentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericArgumentResolver")
            .field("name", &self.name)
            .field("type", &self.type_)
            .finish_non_exhaustive()
    }
}
