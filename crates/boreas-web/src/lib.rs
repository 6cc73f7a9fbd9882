//! # Boreas Web
//!
//! Request interceptors and startup configurers for the Boreas framework.
//!
//! Interceptors run before argument resolution and may reject a request.
//! Configurers are application components that register interceptors once
//! at startup; they are built through the dependency container so they can
//! depend on other services.
//!
//! ## Example
//!
//! ```rust
//! use boreas_core::di::{Container, Injectable, InjectionError};
//! use boreas_web::{run_configurers, Configurer, Configurers, InterceptorRegistry, RequireHeader};
//!
//! struct SecurityConfigurer;
//!
//! impl Injectable for SecurityConfigurer {
//!     fn inject(_: &Container) -> Result<Self, InjectionError> {
//!         Ok(Self)
//!     }
//! }
//!
//! impl Configurer for SecurityConfigurer {
//!     fn add_interceptors(&self, registry: &mut InterceptorRegistry) {
//!         registry.add_interceptor(RequireHeader::new("authorization"));
//!     }
//! }
//!
//! let mut configurers = Configurers::new();
//! configurers.register::<SecurityConfigurer>();
//!
//! let mut registry = InterceptorRegistry::new();
//! run_configurers(&configurers, &Container::new(), &mut registry).unwrap();
//! assert_eq!(registry.len(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/boreas-web/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod configurer;
mod interceptor;

pub use configurer::{run_configurers, Configurer, Configurers};
pub use interceptor::{Interceptor, InterceptorError, InterceptorRegistry, RequireHeader};
