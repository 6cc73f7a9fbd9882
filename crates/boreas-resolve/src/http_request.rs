//! Injection of the inbound request itself.

use crate::{ArgumentResolver, ArgumentValue, ResolveError};
use boreas_core::{ComponentMethodArgument, HttpRequest, ResponseHeaders};
use std::sync::Arc;

/// Supplies the current [`HttpRequest`] to arguments declared as
/// `HttpRequest` or as a type that declares `HttpRequest` as an ancestor.
///
/// The value shares the request's allocation, so the controller sees the
/// very same request the dispatcher received.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRequestArgumentResolver;

impl ArgumentResolver for HttpRequestArgumentResolver {
    fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
        argument.type_().is_subtype_of::<HttpRequest>()
    }

    fn resolve_argument(
        &self,
        _argument: &ComponentMethodArgument,
        request: &HttpRequest,
        _response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError> {
        Ok(Arc::new(request.clone()))
    }
}
