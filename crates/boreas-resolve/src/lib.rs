//! # Boreas Resolve
//!
//! Argument resolution for Boreas controller methods.
//!
//! Before a controller method runs, every declared argument must be turned
//! into a value. This crate provides the strategy trait and the chain that
//! dispatches to it:
//!
//! - [`ArgumentResolver`] - Strategy producing one argument's value
//! - [`ArgumentsResolver`] - Ordered, caching chain of resolvers
//! - [`HttpRequestArgumentResolver`] - Injects the request itself
//! - [`RequestBodyArgumentResolver`] - Decodes the parsed body
//! - [`PathVariableArgumentResolver`] - Decodes `{name}` path captures
//! - [`QueryParameterArgumentResolver`] - Decodes declared query parameters
//! - [`GenericArgumentResolver`] - Closure-backed resolver for one name and type
//! - [`Converters`] - Type-keyed decoders shared by the built-in resolvers
//!
//! ## Example
//!
//! ```rust
//! use boreas_core::{ComponentMethod, HttpRequest, ResponseHeaders};
//! use boreas_resolve::{ArgumentsResolver, HttpRequestArgumentResolver};
//!
//! let chain = ArgumentsResolver::new();
//! chain.add_argument_resolver(HttpRequestArgumentResolver);
//!
//! let method = ComponentMethod::builder("handle")
//!     .argument::<HttpRequest>("request")
//!     .build();
//! let request = HttpRequest::builder().uri("/ping").build();
//!
//! let arguments = chain
//!     .resolve_arguments(&method, &request, &mut ResponseHeaders::new())
//!     .unwrap();
//! assert!(arguments.contains("request"));
//! ```

#![doc(html_root_url = "https://docs.rs/boreas-resolve/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod arguments;
mod converter;
mod error;
mod generic;
mod http_request;
mod path;
mod query;
mod request_body;
mod resolver;

pub use arguments::ArgumentsResolver;
pub use converter::Converters;
pub use error::{ConversionError, ParameterLocation, ResolveError};
pub use generic::GenericArgumentResolver;
pub use http_request::HttpRequestArgumentResolver;
pub use path::PathVariableArgumentResolver;
pub use query::QueryParameterArgumentResolver;
pub use request_body::{RequestBodyArgumentResolver, DEFAULT_MAX_BODY_BYTES};
pub use resolver::{ArgumentResolver, ArgumentValue, ResolvedArguments};
