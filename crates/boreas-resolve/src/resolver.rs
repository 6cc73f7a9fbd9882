//! The argument resolver strategy and resolved values.

use crate::ResolveError;
use boreas_core::{ComponentMethodArgument, HttpRequest, ResponseHeaders};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A resolved argument value.
///
/// Values are type-erased so that one chain can produce arguments of any
/// declared type; callers downcast through [`ResolvedArguments::get`].
pub type ArgumentValue = Arc<dyn Any + Send + Sync>;

/// Strategy that produces the value of a controller argument.
///
/// Resolvers are consulted in registration order. The first one whose
/// [`is_supported`](ArgumentResolver::is_supported) returns `true` for an
/// argument is chosen and remembered for that argument.
///
/// # Implementing `ArgumentResolver`
///
/// ```rust
/// use boreas_core::{ComponentMethodArgument, HttpRequest, ResponseHeaders};
/// use boreas_resolve::{ArgumentResolver, ArgumentValue, ResolveError};
/// use std::sync::Arc;
///
/// /// Supplies the `x-tenant` header to any `String` argument named `tenant`.
/// struct TenantResolver;
///
/// impl ArgumentResolver for TenantResolver {
///     fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
///         argument.name() == "tenant" && argument.type_().is::<String>()
///     }
///
///     fn resolve_argument(
///         &self,
///         _argument: &ComponentMethodArgument,
///         request: &HttpRequest,
///         _response_headers: &mut ResponseHeaders,
///     ) -> Result<ArgumentValue, ResolveError> {
///         let tenant = request.header("x-tenant").unwrap_or("default").to_string();
///         Ok(Arc::new(tenant))
///     }
/// }
/// ```
pub trait ArgumentResolver: Send + Sync {
    /// Returns `true` if this resolver can produce `argument`.
    ///
    /// Must be cheap and free of side effects; the answer is cached per
    /// argument.
    fn is_supported(&self, argument: &ComponentMethodArgument) -> bool;

    /// Produces the value of `argument` from `request`.
    ///
    /// Only called for arguments this resolver supports. May add headers to
    /// the eventual response.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the request does not carry a usable value.
    fn resolve_argument(
        &self,
        argument: &ComponentMethodArgument,
        request: &HttpRequest,
        response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError>;

    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl<R: ArgumentResolver + ?Sized> ArgumentResolver for Arc<R> {
    fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
        (**self).is_supported(argument)
    }

    fn resolve_argument(
        &self,
        argument: &ComponentMethodArgument,
        request: &HttpRequest,
        response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError> {
        (**self).resolve_argument(argument, request, response_headers)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Resolved arguments keyed by argument name, in declaration order.
///
/// # Example
///
/// ```rust
/// use boreas_resolve::ResolvedArguments;
/// use std::sync::Arc;
///
/// let mut arguments = ResolvedArguments::new();
/// arguments.insert("limit", Arc::new(20_u32));
///
/// assert_eq!(arguments.get::<u32>("limit"), Some(&20));
/// assert_eq!(arguments.get::<i64>("limit"), None);
/// ```
#[derive(Clone, Default)]
pub struct ResolvedArguments {
    values: IndexMap<String, ArgumentValue>,
}

impl ResolvedArguments {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any earlier value for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgumentValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value for `name` if it has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|v| (**v).downcast_ref::<T>())
    }

    /// Returns a shared handle to the value for `name` if it has type `T`.
    #[must_use]
    pub fn get_arc<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.values
            .get(name)
            .and_then(|v| Arc::clone(v).downcast::<T>().ok())
    }

    /// Returns the type-erased value for `name`.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&ArgumentValue> {
        self.values.get(name)
    }

    /// Returns `true` if a value exists for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over argument names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgumentValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of resolved arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ResolvedArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}
