//! The resolver chain.

use crate::{ArgumentResolver, ArgumentValue, ResolveError, ResolvedArguments};
use boreas_core::{ArgumentKey, ComponentMethod, ComponentMethodArgument, HttpRequest, ResponseHeaders};
use boreas_telemetry::metrics;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Ordered chain of resolvers with a per-argument resolution cache.
///
/// Resolvers registered earlier take precedence. The first resolver that
/// supports an argument is remembered for that argument (keyed by owning
/// method, name and declared type), so later calls skip the support scan.
/// Registering a resolver clears the cache, since it may change which
/// resolver is first to support an argument. Entries are never evicted
/// otherwise, so methods should be built once and reused: every
/// [`ComponentMethod::builder`] build gets a new id and new entries.
///
/// The chain is itself an [`ArgumentResolver`] that supports every argument,
/// so it can be nested inside another chain.
///
/// # Example
///
/// ```rust
/// use boreas_core::{ComponentMethod, HttpRequest, ResponseHeaders};
/// use boreas_resolve::{ArgumentsResolver, HttpRequestArgumentResolver};
///
/// let resolver = ArgumentsResolver::new();
/// resolver.add_argument_resolver(HttpRequestArgumentResolver);
///
/// let method = ComponentMethod::builder("handle")
///     .argument::<HttpRequest>("request")
///     .build();
/// let request = HttpRequest::builder().uri("/ping").build();
///
/// let arguments = resolver
///     .resolve_arguments(&method, &request, &mut ResponseHeaders::new())
///     .unwrap();
/// let resolved = arguments.get::<HttpRequest>("request").unwrap();
/// assert!(HttpRequest::ptr_eq(resolved, &request));
/// ```
#[derive(Default)]
pub struct ArgumentsResolver {
    resolvers: RwLock<Vec<Arc<dyn ArgumentResolver>>>,
    cache: DashMap<ArgumentKey, Arc<dyn ArgumentResolver>>,
}

impl ArgumentsResolver {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolver with the lowest precedence so far.
    pub fn add_argument_resolver<R: ArgumentResolver + 'static>(&self, resolver: R) {
        self.add_shared_resolver(Arc::new(resolver));
    }

    /// Appends an already shared resolver.
    ///
    /// The same resolver may be registered more than once; only its first
    /// position can ever be selected.
    pub fn add_shared_resolver(&self, resolver: Arc<dyn ArgumentResolver>) {
        let mut resolvers = self.resolvers.write();
        tracing::debug!(
            resolver = resolver.name(),
            position = resolvers.len(),
            "Registering argument resolver"
        );
        resolvers.push(resolver);
        self.cache.clear();
    }

    /// Returns the number of registered resolvers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    /// Returns `true` if no resolver is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }

    /// Returns the number of arguments with a cached resolver.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Resolves every argument of `method` in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`]; no partial result is produced.
    pub fn resolve_arguments(
        &self,
        method: &ComponentMethod,
        request: &HttpRequest,
        response_headers: &mut ResponseHeaders,
    ) -> Result<ResolvedArguments, ResolveError> {
        let started = Instant::now();
        let mut resolved = ResolvedArguments::new();

        for argument in method.arguments() {
            let value = self.resolve_argument(argument, request, response_headers)?;
            resolved.insert(argument.name(), value);
        }

        metrics::record_resolve_duration(method.name(), started.elapsed());
        Ok(resolved)
    }

    /// Returns the resolver selected for `argument`, consulting the cache.
    pub fn find_resolver(&self, argument: &ComponentMethodArgument) -> Option<Arc<dyn ArgumentResolver>> {
        let key = argument.key();

        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!(argument = argument.name(), resolver = cached.name(), "Resolver cache hit");
            metrics::record_cache_hit();
            return Some(Arc::clone(cached.value()));
        }

        metrics::record_cache_miss();

        // Cache under the read lock so a concurrent registration cannot
        // leave a stale entry behind after clearing.
        let resolvers = self.resolvers.read();
        let selected = resolvers.iter().find(|r| r.is_supported(argument)).cloned()?;
        self.cache.insert(key, Arc::clone(&selected));

        tracing::debug!(
            method = argument.method().name(),
            argument = argument.name(),
            resolver = selected.name(),
            "Selected argument resolver"
        );
        Some(selected)
    }
}

impl ArgumentResolver for ArgumentsResolver {
    fn is_supported(&self, _argument: &ComponentMethodArgument) -> bool {
        true
    }

    fn resolve_argument(
        &self,
        argument: &ComponentMethodArgument,
        request: &HttpRequest,
        response_headers: &mut ResponseHeaders,
    ) -> Result<ArgumentValue, ResolveError> {
        let Some(resolver) = self.find_resolver(argument) else {
            tracing::warn!(
                method = argument.method().name(),
                argument = argument.name(),
                argument_type = %argument.type_(),
                "No resolver supports argument"
            );
            metrics::record_unsupported_argument(argument.method().name());
            return Err(ResolveError::not_supported(argument));
        };

        let value = resolver.resolve_argument(argument, request, response_headers)?;
        metrics::record_argument_resolved(resolver.name());
        Ok(value)
    }
}

impl fmt::Debug for ArgumentsResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.resolvers.read().iter().map(|r| r.name()).collect();
        f.debug_struct("ArgumentsResolver")
            .field("resolvers", &names)
            .field("cached", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenericArgumentResolver;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Supports arguments with a given name and counts support checks.
    struct Counting {
        name: &'static str,
        value: i32,
        checks: Arc<AtomicUsize>,
    }

    impl Counting {
        fn new(name: &'static str, value: i32) -> (Self, Arc<AtomicUsize>) {
            let checks = Arc::new(AtomicUsize::new(0));
            let resolver = Self {
                name,
                value,
                checks: Arc::clone(&checks),
            };
            (resolver, checks)
        }
    }

    impl ArgumentResolver for Counting {
        fn is_supported(&self, argument: &ComponentMethodArgument) -> bool {
            self.checks.fetch_add(1, Ordering::SeqCst);
            argument.name() == self.name
        }

        fn resolve_argument(
            &self,
            _argument: &ComponentMethodArgument,
            _request: &HttpRequest,
            _response_headers: &mut ResponseHeaders,
        ) -> Result<ArgumentValue, ResolveError> {
            Ok(Arc::new(self.value))
        }
    }

    fn request() -> HttpRequest {
        HttpRequest::builder().build()
    }

    #[test]
    fn test_unsupported_argument() {
        let resolver = ArgumentsResolver::new();
        let method = ComponentMethod::builder("m").argument::<String>("foo").build();
        let argument = method.get_argument("foo").unwrap();

        let err = resolver
            .resolve_argument(argument, &request(), &mut ResponseHeaders::new())
            .unwrap_err();

        assert!(matches!(err, ResolveError::ArgumentNotSupported { .. }));
        assert_eq!(err.to_string(), "Unable to resolve argument foo: String");
    }

    #[test]
    fn test_chain_supports_everything() {
        let resolver = ArgumentsResolver::new();
        let method = ComponentMethod::builder("m").argument::<String>("anything").build();
        assert!(resolver.is_supported(&method.arguments()[0]));
    }

    #[test]
    fn test_cache_skips_support_scan() {
        let resolver = ArgumentsResolver::new();
        let (counting, checks) = Counting::new("x", 1);
        resolver.add_argument_resolver(counting);

        let method = ComponentMethod::builder("m").argument::<i32>("x").build();
        let argument = method.get_argument("x").unwrap();
        let mut headers = ResponseHeaders::new();

        resolver.resolve_argument(argument, &request(), &mut headers).unwrap();
        assert_eq!(checks.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached_len(), 1);

        for _ in 0..5 {
            resolver.resolve_argument(argument, &request(), &mut headers).unwrap();
        }
        assert_eq!(checks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registration_order_decides_precedence() {
        let resolver = ArgumentsResolver::new();
        let (first, _) = Counting::new("x", 1);
        let (second, second_checks) = Counting::new("x", 2);
        resolver.add_argument_resolver(first);
        resolver.add_argument_resolver(second);

        let method = ComponentMethod::builder("m").argument::<i32>("x").build();
        let arguments = resolver
            .resolve_arguments(&method, &request(), &mut ResponseHeaders::new())
            .unwrap();

        assert_eq!(arguments.get::<i32>("x"), Some(&1));
        assert_eq!(second_checks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_registration_clears_cache() {
        let resolver = ArgumentsResolver::new();
        let (fallback, _) = Counting::new("x", 1);
        resolver.add_argument_resolver(fallback);

        let method = ComponentMethod::builder("m").argument::<i32>("x").build();
        let argument = method.get_argument("x").unwrap();
        resolver.resolve_argument(argument, &request(), &mut ResponseHeaders::new()).unwrap();
        assert_eq!(resolver.cached_len(), 1);

        let (later, _) = Counting::new("x", 2);
        resolver.add_argument_resolver(later);
        assert_eq!(resolver.cached_len(), 0);

        // The earlier resolver still wins after the rescan.
        let value = resolver
            .resolve_argument(argument, &request(), &mut ResponseHeaders::new())
            .unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&1));
    }

    #[test]
    fn test_cache_is_per_method() {
        let resolver = ArgumentsResolver::new();
        let (counting, checks) = Counting::new("x", 1);
        resolver.add_argument_resolver(counting);

        let a = ComponentMethod::builder("a").argument::<i32>("x").build();
        let b = ComponentMethod::builder("b").argument::<i32>("x").build();
        let mut headers = ResponseHeaders::new();
        resolver.resolve_arguments(&a, &request(), &mut headers).unwrap();
        resolver.resolve_arguments(&b, &request(), &mut headers).unwrap();

        assert_eq!(checks.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.cached_len(), 2);
    }

    #[test]
    fn test_cloned_method_reuses_cache_entry() {
        let resolver = ArgumentsResolver::new();
        let (counting, checks) = Counting::new("x", 1);
        resolver.add_argument_resolver(counting);

        let method = ComponentMethod::builder("a").argument::<i32>("x").build();
        let mut headers = ResponseHeaders::new();
        for _ in 0..3 {
            let shared = method.clone();
            resolver.resolve_arguments(&shared, &request(), &mut headers).unwrap();
        }
        assert_eq!(checks.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached_len(), 1);

        let rebuilt = ComponentMethod::builder("a").argument::<i32>("x").build();
        resolver.resolve_arguments(&rebuilt, &request(), &mut headers).unwrap();
        assert_eq!(resolver.cached_len(), 2);
    }

    #[test]
    fn test_first_failure_aborts() {
        let resolver = ArgumentsResolver::new();
        let (counting, _) = Counting::new("known", 1);
        resolver.add_argument_resolver(counting);

        let method = ComponentMethod::builder("m")
            .argument::<i32>("known")
            .argument::<String>("unknown")
            .build();

        let err = resolver
            .resolve_arguments(&method, &request(), &mut ResponseHeaders::new())
            .unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_nested_chain() {
        let inner = ArgumentsResolver::new();
        inner.add_argument_resolver(GenericArgumentResolver::typed::<i32, _>("x", |_, _, _| Ok(5)));

        let outer = ArgumentsResolver::new();
        outer.add_argument_resolver(inner);

        let method = ComponentMethod::builder("m").argument::<i32>("x").build();
        let arguments = outer
            .resolve_arguments(&method, &request(), &mut ResponseHeaders::new())
            .unwrap();
        assert_eq!(arguments.get::<i32>("x"), Some(&5));
    }

    #[test]
    fn test_concurrent_resolution() {
        let resolver = Arc::new(ArgumentsResolver::new());
        let (counting, _) = Counting::new("x", 9);
        resolver.add_argument_resolver(counting);
        let method = Arc::new(ComponentMethod::builder("m").argument::<i32>("x").build());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                let method = Arc::clone(&method);
                std::thread::spawn(move || {
                    let arguments = resolver
                        .resolve_arguments(&method, &request(), &mut ResponseHeaders::new())
                        .unwrap();
                    *arguments.get::<i32>("x").unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 9);
        }
        assert_eq!(resolver.cached_len(), 1);
    }

    #[test]
    fn test_records_cache_and_unsupported_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            let resolver = ArgumentsResolver::new();
            let (counting, _) = Counting::new("x", 1);
            resolver.add_argument_resolver(counting);

            let method = ComponentMethod::builder("metered")
                .argument::<i32>("x")
                .argument::<String>("unknown")
                .build();
            let supported = method.get_argument("x").unwrap();
            let unsupported = method.get_argument("unknown").unwrap();
            let mut headers = ResponseHeaders::new();

            resolver.resolve_argument(supported, &request(), &mut headers).unwrap();
            resolver.resolve_argument(supported, &request(), &mut headers).unwrap();
            assert!(resolver
                .resolve_argument(unsupported, &request(), &mut headers)
                .is_err());
        });

        let rendered = handle.render();
        assert!(rendered.contains("boreas_resolver_cache_hits_total 1"), "{rendered}");
        assert!(rendered.contains("boreas_resolver_cache_misses_total 2"), "{rendered}");
        assert!(
            rendered.contains("boreas_arguments_unsupported_total{method=\"metered\"} 1"),
            "{rendered}"
        );
    }

    proptest! {
        #[test]
        fn prop_empty_chain_reports_argument_name(name in "[a-z_][a-z0-9_]{0,15}") {
            let resolver = ArgumentsResolver::new();
            let method = ComponentMethod::builder("m").argument::<u64>(name.clone()).build();

            let err = resolver
                .resolve_arguments(&method, &request(), &mut ResponseHeaders::new())
                .unwrap_err();

            prop_assert!(
                matches!(err, ResolveError::ArgumentNotSupported { name: ref n, .. } if *n == name),
                "unexpected error: {err}"
            );
            prop_assert!(err.to_string().contains(&name));
        }

        #[test]
        fn prop_resolves_exactly_declared_names(
            names in proptest::collection::btree_set("[a-z][a-z0-9_]{0,10}", 0..8)
        ) {
            let resolver = ArgumentsResolver::new();
            resolver.add_argument_resolver(AnyName);

            let mut builder = ComponentMethod::builder("m");
            for name in &names {
                builder = builder.argument::<String>(name.clone());
            }
            let method = builder.build();

            let arguments = resolver
                .resolve_arguments(&method, &request(), &mut ResponseHeaders::new())
                .unwrap();

            let resolved: Vec<&str> = arguments.names().collect();
            let declared: Vec<&str> = names.iter().map(String::as_str).collect();
            prop_assert_eq!(resolved, declared);
            for name in &names {
                prop_assert_eq!(arguments.get::<String>(name), Some(name));
            }
        }
    }

    /// Resolves any argument to its own name.
    struct AnyName;

    impl ArgumentResolver for AnyName {
        fn is_supported(&self, _argument: &ComponentMethodArgument) -> bool {
            true
        }

        fn resolve_argument(
            &self,
            argument: &ComponentMethodArgument,
            _request: &HttpRequest,
            _response_headers: &mut ResponseHeaders,
        ) -> Result<ArgumentValue, ResolveError> {
            Ok(Arc::new(argument.name().to_string()))
        }
    }
}
