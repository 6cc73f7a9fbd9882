//! Dependency injection container.
//!
//! Services are registered once at application startup and looked up by
//! type. Types that know how to build themselves from other services
//! implement [`Injectable`]; [`Container::get`] then returns the registered
//! instance if there is one and constructs a fresh instance otherwise.
//!
//! # Example
//!
//! ```rust
//! use boreas_core::di::{Container, Injectable, InjectionError};
//! use std::sync::Arc;
//!
//! struct Settings {
//!     api_version: &'static str,
//! }
//!
//! struct VersionHeader {
//!     settings: Arc<Settings>,
//! }
//!
//! impl Injectable for VersionHeader {
//!     fn inject(container: &Container) -> Result<Self, InjectionError> {
//!         Ok(Self {
//!             settings: container.resolve_required()?,
//!         })
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.register(Arc::new(Settings { api_version: "v2" }));
//!
//! let header = container.get::<VersionHeader>().unwrap();
//! assert_eq!(header.settings.api_version, "v2");
//! ```

use crate::types::readable_type_name;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error when a dependency cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to inject {type_name}: {reason}")]
pub struct InjectionError {
    /// Readable name of the type that could not be resolved.
    pub type_name: String,
    /// The reason for the failure.
    pub reason: String,
}

impl InjectionError {
    /// Creates an injection error for a missing service.
    #[must_use]
    pub fn not_registered<T>() -> Self {
        Self::custom::<T>("service not registered")
    }

    /// Creates an injection error with a custom reason.
    #[must_use]
    pub fn custom<T>(reason: impl Into<String>) -> Self {
        Self {
            type_name: readable_type_name(std::any::type_name::<T>()),
            reason: reason.into(),
        }
    }
}

/// A type that can be constructed from the services in a [`Container`].
pub trait Injectable: Sized {
    /// Builds an instance, resolving dependencies from `container`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if a dependency is missing.
    fn inject(container: &Container) -> Result<Self, InjectionError>;
}

/// A dependency injection container.
///
/// Stores `Arc`-wrapped services keyed by their type. The container is
/// `Send + Sync` and is typically shared read-only after startup.
#[derive(Default, Clone)]
pub struct Container {
    services: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Container {
    /// Creates a new empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service, replacing any earlier service of the same type.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: Arc<T>) {
        tracing::trace!(service = std::any::type_name::<T>(), "Registering service");
        self.services.insert(TypeId::of::<T>(), service);
    }

    /// Resolves a registered service.
    #[must_use]
    pub fn resolve<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|s| Arc::clone(s).downcast::<T>().ok())
    }

    /// Resolves a registered service or returns an error.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the service is not registered.
    pub fn resolve_required<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        self.resolve().ok_or_else(InjectionError::not_registered::<T>)
    }

    /// Returns the registered `T`, or builds one through [`Injectable`].
    ///
    /// Built instances are not stored.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if construction fails.
    pub fn get<T: Injectable + Send + Sync + 'static>(&self) -> Result<Arc<T>, InjectionError> {
        if let Some(service) = self.resolve::<T>() {
            return Ok(service);
        }
        tracing::trace!(service = std::any::type_name::<T>(), "Constructing injectable");
        T::inject(self).map(Arc::new)
    }

    /// Checks if a service is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("service_count", &self.services.len())
            .finish()
    }
}
