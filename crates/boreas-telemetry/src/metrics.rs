//! Prometheus metrics for argument resolution.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `boreas_resolver_cache_hits_total` | Counter | - | Resolver lookups served from the cache |
//! | `boreas_resolver_cache_misses_total` | Counter | - | Resolver lookups that scanned the chain |
//! | `boreas_arguments_unsupported_total` | Counter | `method` | Arguments no resolver supports |
//! | `boreas_arguments_resolved_total` | Counter | `resolver` | Arguments resolved, by resolver |
//! | `boreas_resolve_duration_seconds` | Histogram | `method` | Time to resolve all arguments of a call |
//! | `boreas_interceptor_rejections_total` | Counter | `interceptor` | Requests rejected by an interceptor |
//!
//! Recording functions are no-ops until a recorder is installed, so library
//! code records unconditionally.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Global metrics handle for rendering.
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Installs the Prometheus recorder as the global metrics recorder.
///
/// The host application serves [`render_metrics`] on its own endpoint.
///
/// # Errors
///
/// Returns `TelemetryError::MetricsInit` if a recorder is already installed.
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;

    let _ = METRICS_HANDLE.set(handle);

    register_metric_descriptions();

    Ok(())
}

/// Renders metrics in Prometheus text format.
///
/// Returns `None` if metrics are not initialized.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn register_metric_descriptions() {
    describe_counter!(
        "boreas_resolver_cache_hits_total",
        "Resolver lookups served from the resolution cache"
    );
    describe_counter!(
        "boreas_resolver_cache_misses_total",
        "Resolver lookups that scanned the resolver chain"
    );
    describe_counter!(
        "boreas_arguments_unsupported_total",
        "Arguments for which no registered resolver is applicable"
    );
    describe_counter!(
        "boreas_arguments_resolved_total",
        "Arguments resolved, by resolver"
    );
    describe_histogram!(
        "boreas_resolve_duration_seconds",
        "Time spent resolving all arguments of a controller call"
    );
    describe_counter!(
        "boreas_interceptor_rejections_total",
        "Requests rejected by an interceptor"
    );
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Records a resolver lookup served from the cache.
pub fn record_cache_hit() {
    counter!("boreas_resolver_cache_hits_total").increment(1);
}

/// Records a resolver lookup that scanned the chain.
pub fn record_cache_miss() {
    counter!("boreas_resolver_cache_misses_total").increment(1);
}

/// Records an argument that no resolver supports.
pub fn record_unsupported_argument(method: &str) {
    counter!(
        "boreas_arguments_unsupported_total",
        "method" => method.to_string()
    )
    .increment(1);
}

/// Records an argument resolved by `resolver`.
pub fn record_argument_resolved(resolver: &'static str) {
    counter!("boreas_arguments_resolved_total", "resolver" => resolver).increment(1);
}

/// Records the time taken to resolve all arguments of `method`.
pub fn record_resolve_duration(method: &str, duration: Duration) {
    histogram!(
        "boreas_resolve_duration_seconds",
        "method" => method.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a request rejected by `interceptor`.
pub fn record_interceptor_rejection(interceptor: &str) {
    counter!(
        "boreas_interceptor_rejections_total",
        "interceptor" => interceptor.to_string()
    )
    .increment(1);
}
