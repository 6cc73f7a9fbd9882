//! # Boreas
//!
//! **Controller argument resolution for HTTP services**
//!
//! Boreas turns an inbound request into the arguments of a declared
//! controller method:
//!
//! - **Resolver chain** - Ordered strategies, first match wins, memoized per argument
//! - **Built-in resolvers** - The request itself, the body, path variables and query parameters
//! - **Interceptors** - Pre-handle hooks registered by startup configurers
//! - **Observability** - Structured `tracing` logs and Prometheus metrics
//!
//! ## Quick Start
//!
//! ```rust
//! use boreas::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct UserDto {
//!     id: u64,
//! }
//!
//! let app = Application::builder().converter::<UserDto>().build().unwrap();
//!
//! let method = ComponentMethod::builder("create_user")
//!     .argument::<HttpRequest>("request")
//!     .argument::<UserDto>("payload")
//!     .annotate(RequestBodyAnnotation::new("payload"))
//!     .unwrap()
//!     .build();
//! let request = HttpRequest::builder().body(r#"{"id": 1}"#).build();
//!
//! let invocation = app.prepare(&method, &request).unwrap();
//! assert_eq!(invocation.arguments().get::<UserDto>("payload"), Some(&UserDto { id: 1 }));
//! ```
//!
//! ## Resolution order
//!
//! ```text
//! Request → Interceptors → for each argument: cache hit? ─yes→ cached resolver
//!                                               │no
//!                                               └→ first supporting resolver (memoized)
//! ```

#![doc(html_root_url = "https://docs.rs/boreas/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod application;
mod error;

pub use application::{Application, ApplicationBuilder, Invocation};
pub use error::{BootError, DispatchError};

// Re-export core types
pub use boreas_core as core;

// Re-export resolution types
pub use boreas_resolve as resolve;

// Re-export interceptor and configurer types
pub use boreas_web as web;

// Re-export configuration types
pub use boreas_config as config;

// Re-export telemetry
pub use boreas_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use boreas::prelude::*;
///
/// let chain = ArgumentsResolver::new();
/// chain.add_argument_resolver(HttpRequestArgumentResolver);
/// assert_eq!(chain.len(), 1);
/// ```
pub mod prelude {
    pub use crate::{Application, ApplicationBuilder, BootError, DispatchError, Invocation};

    pub use boreas_core::{
        ArgumentType, ComponentMethod, ComponentMethodArgument, HttpRequest,
        MapQueryParameterAnnotation, RequestBodyAnnotation, ResponseHeaders, RouteAnnotation,
    };

    // Re-export DI types
    pub use boreas_core::di::{Container, Injectable, InjectionError};

    pub use boreas_resolve::{
        ArgumentResolver, ArgumentValue, ArgumentsResolver, Converters, GenericArgumentResolver,
        HttpRequestArgumentResolver, ResolveError, ResolvedArguments,
    };

    pub use boreas_web::{Configurer, Interceptor, InterceptorError, InterceptorRegistry};

    pub use boreas_config::{BoreasConfig, ConfigLoader};
}
