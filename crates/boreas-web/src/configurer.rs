//! Startup configurers.
//!
//! A [`Configurer`] is an application component that registers interceptors
//! when the application boots. Configurers are listed explicitly in a
//! [`Configurers`] set; [`run_configurers`] builds each one through the
//! dependency container and lets it populate the [`InterceptorRegistry`].

use crate::InterceptorRegistry;
use boreas_core::di::{Container, Injectable, InjectionError};
use std::any::type_name;
use std::fmt;

/// Application component that registers interceptors at startup.
pub trait Configurer: Send + Sync + 'static {
    /// Adds this component's interceptors to `registry`.
    fn add_interceptors(&self, registry: &mut InterceptorRegistry);
}

type RunFn = fn(&Container, &mut InterceptorRegistry) -> Result<(), InjectionError>;

struct Entry {
    name: &'static str,
    run: RunFn,
}

fn run<C: Configurer + Injectable>(
    container: &Container,
    registry: &mut InterceptorRegistry,
) -> Result<(), InjectionError> {
    let configurer = container.get::<C>()?;
    configurer.add_interceptors(registry);
    Ok(())
}

/// Ordered list of configurer types to run at startup.
#[derive(Default)]
pub struct Configurers {
    entries: Vec<Entry>,
}

impl Configurers {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds configurer type `C`. Registering a type twice has no effect.
    pub fn register<C: Configurer + Injectable>(&mut self) -> &mut Self {
        let name = type_name::<C>();
        if self.entries.iter().any(|entry| entry.name == name) {
            tracing::debug!(configurer = name, "Configurer already registered");
        } else {
            self.entries.push(Entry { name, run: run::<C> });
        }
        self
    }

    /// Returns the number of registered configurer types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no configurer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Configurers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|e| e.name)).finish()
    }
}

/// Builds every registered configurer through `container` and lets it add
/// its interceptors, in registration order.
///
/// # Errors
///
/// Returns the first [`InjectionError`]; configurers after it do not run.
pub fn run_configurers(
    configurers: &Configurers,
    container: &Container,
    registry: &mut InterceptorRegistry,
) -> Result<(), InjectionError> {
    for entry in &configurers.entries {
        tracing::debug!(configurer = entry.name, "Running configurer");
        (entry.run)(container, registry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interceptor, InterceptorError};
    use boreas_core::{HttpRequest, ResponseHeaders};
    use std::sync::Arc;

    struct Named(&'static str);

    impl Interceptor for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn pre_handle(&self, _: &HttpRequest, _: &mut ResponseHeaders) -> Result<(), InterceptorError> {
            Ok(())
        }
    }

    struct AuditConfigurer;

    impl Injectable for AuditConfigurer {
        fn inject(_: &Container) -> Result<Self, InjectionError> {
            Ok(Self)
        }
    }

    impl Configurer for AuditConfigurer {
        fn add_interceptors(&self, registry: &mut InterceptorRegistry) {
            registry.add_interceptor(Named("audit"));
        }
    }

    struct Settings {
        interceptor: &'static str,
    }

    struct SettingsConfigurer {
        settings: Arc<Settings>,
    }

    impl Injectable for SettingsConfigurer {
        fn inject(container: &Container) -> Result<Self, InjectionError> {
            Ok(Self {
                settings: container.resolve_required()?,
            })
        }
    }

    impl Configurer for SettingsConfigurer {
        fn add_interceptors(&self, registry: &mut InterceptorRegistry) {
            registry.add_interceptor(Named(self.settings.interceptor));
        }
    }

    #[test]
    fn test_runs_in_registration_order() {
        let mut configurers = Configurers::new();
        configurers
            .register::<SettingsConfigurer>()
            .register::<AuditConfigurer>();

        let mut container = Container::new();
        container.register(Arc::new(Settings { interceptor: "settings" }));

        let mut registry = InterceptorRegistry::new();
        run_configurers(&configurers, &container, &mut registry).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["settings", "audit"]);
    }

    #[test]
    fn test_registered_instance_is_used() {
        let mut container = Container::new();
        container.register(Arc::new(SettingsConfigurer {
            settings: Arc::new(Settings { interceptor: "prebuilt" }),
        }));

        let mut configurers = Configurers::new();
        configurers.register::<SettingsConfigurer>();

        let mut registry = InterceptorRegistry::new();
        run_configurers(&configurers, &container, &mut registry).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["prebuilt"]);
    }

    #[test]
    fn test_missing_dependency_fails() {
        let mut configurers = Configurers::new();
        configurers
            .register::<AuditConfigurer>()
            .register::<SettingsConfigurer>();

        let mut registry = InterceptorRegistry::new();
        let err = run_configurers(&configurers, &Container::new(), &mut registry).unwrap_err();

        assert_eq!(err.type_name, "Settings");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_ignored() {
        let mut configurers = Configurers::new();
        configurers.register::<AuditConfigurer>().register::<AuditConfigurer>();
        assert_eq!(configurers.len(), 1);
    }

    #[test]
    fn test_empty() {
        let configurers = Configurers::new();
        let mut registry = InterceptorRegistry::new();

        assert!(configurers.is_empty());
        run_configurers(&configurers, &Container::new(), &mut registry).unwrap();
        assert!(registry.is_empty());
    }
}
