//! Application bootstrap and per-request preparation.

use crate::{BootError, DispatchError};
use boreas_config::BoreasConfig;
use boreas_core::di::{Container, Injectable};
use boreas_core::{ComponentMethod, HttpRequest, ResponseHeaders};
use boreas_resolve::{
    ArgumentResolver, ArgumentsResolver, Converters, HttpRequestArgumentResolver,
    PathVariableArgumentResolver, QueryParameterArgumentResolver, RequestBodyArgumentResolver,
    ResolvedArguments,
};
use boreas_web::{run_configurers, Configurer, Configurers, InterceptorRegistry};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A configured application: the resolver chain, the interceptors and the
/// services they were built from.
///
/// # Example
///
/// ```rust
/// use boreas::prelude::*;
/// use http::Method;
///
/// let app = Application::builder().build().unwrap();
///
/// let method = ComponentMethod::builder("get_user")
///     .argument::<u64>("user_id")
///     .annotate(RouteAnnotation::new(Method::GET, "/users/{user_id}"))
///     .unwrap()
///     .build();
/// let request = HttpRequest::builder()
///     .uri("/users/42")
///     .path_param("user_id", "42")
///     .build();
///
/// let invocation = app.prepare(&method, &request).unwrap();
/// assert_eq!(invocation.arguments().get::<u64>("user_id"), Some(&42));
/// ```
#[derive(Debug)]
pub struct Application {
    config: BoreasConfig,
    container: Arc<Container>,
    resolver: ArgumentsResolver,
    interceptors: InterceptorRegistry,
}

impl Application {
    /// Creates a new application builder.
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Returns the configuration the application was built with.
    #[must_use]
    pub fn config(&self) -> &BoreasConfig {
        &self.config
    }

    /// Returns the service container.
    #[must_use]
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Returns the argument resolver chain.
    #[must_use]
    pub fn arguments_resolver(&self) -> &ArgumentsResolver {
        &self.resolver
    }

    /// Returns the registered interceptors.
    #[must_use]
    pub fn interceptors(&self) -> &InterceptorRegistry {
        &self.interceptors
    }

    /// Appends a resolver after every resolver registered so far.
    ///
    /// Safe to call while requests are being prepared.
    pub fn add_argument_resolver<R: ArgumentResolver + 'static>(&self, resolver: R) {
        self.resolver.add_argument_resolver(resolver);
    }

    /// Runs the interceptors for `request`, then resolves every argument of
    /// `method`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] if an interceptor rejects the request or an
    /// argument cannot be resolved.
    pub fn prepare(
        &self,
        method: &ComponentMethod,
        request: &HttpRequest,
    ) -> Result<Invocation, DispatchError> {
        tracing::debug!(
            method = method.name(),
            http_method = %request.method(),
            path = request.path(),
            "Preparing invocation"
        );

        let mut response_headers = ResponseHeaders::new();
        self.interceptors.pre_handle(request, &mut response_headers)?;

        let arguments = self
            .resolver
            .resolve_arguments(method, request, &mut response_headers)?;

        Ok(Invocation {
            arguments,
            response_headers,
        })
    }
}

/// Resolved arguments and the response headers collected for one call.
#[derive(Debug)]
pub struct Invocation {
    arguments: ResolvedArguments,
    response_headers: ResponseHeaders,
}

impl Invocation {
    /// Returns the resolved arguments keyed by argument name.
    #[must_use]
    pub fn arguments(&self) -> &ResolvedArguments {
        &self.arguments
    }

    /// Returns the headers to add to the eventual response.
    #[must_use]
    pub fn response_headers(&self) -> &ResponseHeaders {
        &self.response_headers
    }

    /// Splits the invocation into its parts.
    #[must_use]
    pub fn into_parts(self) -> (ResolvedArguments, ResponseHeaders) {
        (self.arguments, self.response_headers)
    }
}

/// Builder for [`Application`].
///
/// Built-in resolvers are registered first, in this order: request, body,
/// path variable, query parameter. Resolvers added through
/// [`argument_resolver`](Self::argument_resolver) follow them.
pub struct ApplicationBuilder {
    config: BoreasConfig,
    container: Container,
    converters: Converters,
    resolvers: Vec<Arc<dyn ArgumentResolver>>,
    configurers: Configurers,
    install_telemetry: bool,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    /// Creates a builder with default configuration and the default
    /// converters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: BoreasConfig::default(),
            container: Container::new(),
            converters: Converters::with_defaults(),
            resolvers: Vec::new(),
            configurers: Configurers::new(),
            install_telemetry: false,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: BoreasConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the service container.
    #[must_use]
    pub fn container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    /// Registers a service in the container.
    #[must_use]
    pub fn service<T: Send + Sync + 'static>(mut self, service: Arc<T>) -> Self {
        self.container.register(service);
        self
    }

    /// Replaces the converters used by the built-in resolvers.
    #[must_use]
    pub fn converters(mut self, converters: Converters) -> Self {
        self.converters = converters;
        self
    }

    /// Makes `T` available as a body, path or query argument type.
    #[must_use]
    pub fn converter<T: DeserializeOwned + Send + Sync + 'static>(mut self) -> Self {
        self.converters.register::<T>();
        self
    }

    /// Adds a resolver after the built-in ones.
    #[must_use]
    pub fn argument_resolver<R: ArgumentResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Adds a configurer, built through the container at startup.
    #[must_use]
    pub fn configurer<C: Configurer + Injectable>(mut self) -> Self {
        self.configurers.register::<C>();
        self
    }

    /// Installs logging and metrics from the configuration during
    /// [`build`](Self::build).
    #[must_use]
    pub fn install_telemetry(mut self) -> Self {
        self.install_telemetry = true;
        self
    }

    /// Validates the configuration, wires the resolver chain and runs the
    /// configurers.
    ///
    /// # Errors
    ///
    /// Returns [`BootError`] if:
    /// - The configuration is invalid
    /// - Telemetry cannot be installed
    /// - A configurer cannot be built from the container
    pub fn build(self) -> Result<Application, BootError> {
        self.config.validate()?;

        if self.install_telemetry {
            boreas_telemetry::init_telemetry(&self.config.telemetry())?;
        }

        let converters = Arc::new(self.converters);
        let resolver = ArgumentsResolver::new();
        resolver.add_argument_resolver(HttpRequestArgumentResolver);
        resolver.add_argument_resolver(
            RequestBodyArgumentResolver::new(Arc::clone(&converters))
                .with_max_body_bytes(self.config.request.max_body_bytes),
        );
        resolver.add_argument_resolver(PathVariableArgumentResolver::new(Arc::clone(&converters)));
        resolver.add_argument_resolver(QueryParameterArgumentResolver::new(converters));
        for custom in self.resolvers {
            resolver.add_shared_resolver(custom);
        }

        let mut interceptors = InterceptorRegistry::new();
        run_configurers(&self.configurers, &self.container, &mut interceptors)?;

        tracing::info!(
            resolvers = resolver.len(),
            interceptors = interceptors.len(),
            max_body_bytes = self.config.request.max_body_bytes,
            "Application initialized"
        );

        Ok(Application {
            config: self.config,
            container: Arc::new(self.container),
            resolver,
            interceptors,
        })
    }
}
