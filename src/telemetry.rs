//! Telemetry and observability utilities
//!
//! With the `metrics` feature, every API request is counted and timed via
//! OpenTelemetry. Labels carry the method, URL path and status only; query
//! strings (which contain credential names) are never recorded.

use std::sync::Arc;

#[cfg(feature = "metrics")]
use opentelemetry::{
    metrics::{Counter, Histogram},
    KeyValue,
};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Whether telemetry is enabled
    pub enabled: bool,
    /// Service name for metrics
    pub service_name: String,
    /// Service version for metrics
    pub service_version: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: "credhub-sdk".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// SDK metrics collector
#[derive(Clone)]
pub struct Metrics {
    #[cfg(feature = "metrics")]
    pub(crate) requests_total: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) request_duration: Histogram<f64>,

    #[cfg(feature = "metrics")]
    pub(crate) errors_total: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) token_refreshes: Counter<u64>,
}

impl Metrics {
    /// Create new metrics instance
    #[cfg(feature = "metrics")]
    pub fn new(config: &TelemetryConfig) -> Self {
        use opentelemetry::global;

        let meter = global::meter(config.service_name.clone());

        let requests_total = meter
            .u64_counter("credhub_sdk.requests_total")
            .with_description("Total number of requests made")
            .init();

        let request_duration = meter
            .f64_histogram("credhub_sdk.request_duration_seconds")
            .with_description("Request duration in seconds")
            .init();

        let errors_total = meter
            .u64_counter("credhub_sdk.errors_total")
            .with_description("Total number of failed requests")
            .init();

        let token_refreshes = meter
            .u64_counter("credhub_sdk.token_refreshes_total")
            .with_description("Total number of token refreshes after a 401")
            .init();

        Self {
            requests_total,
            request_duration,
            errors_total,
            token_refreshes,
        }
    }

    /// Create a no-op metrics instance when feature is disabled
    #[cfg(not(feature = "metrics"))]
    pub fn new(_config: &TelemetryConfig) -> Self {
        Self {}
    }

    /// Record a completed request
    #[cfg(feature = "metrics")]
    pub fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let labels = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("path", path.to_string()),
            KeyValue::new("status", status.to_string()),
        ];

        self.requests_total.add(1, labels);
        self.request_duration.record(duration_secs, labels);

        if status >= 400 && status != 404 {
            self.errors_total.add(
                1,
                &[
                    KeyValue::new("type", if status >= 500 { "server" } else { "client" }),
                    KeyValue::new("status", status.to_string()),
                ],
            );
        }
    }

    /// Record a completed request (no-op when metrics disabled)
    #[cfg(not(feature = "metrics"))]
    pub fn record_request(&self, _method: &str, _path: &str, _status: u16, _duration_secs: f64) {}

    /// Record a request that failed before a response arrived
    #[cfg(feature = "metrics")]
    pub fn record_transport_error(&self, method: &str, path: &str) {
        self.errors_total.add(
            1,
            &[
                KeyValue::new("type", "transport"),
                KeyValue::new("method", method.to_string()),
                KeyValue::new("path", path.to_string()),
            ],
        );
    }

    /// Record a transport failure (no-op)
    #[cfg(not(feature = "metrics"))]
    pub fn record_transport_error(&self, _method: &str, _path: &str) {}

    /// Record a token refresh
    #[cfg(feature = "metrics")]
    pub fn record_token_refresh(&self) {
        self.token_refreshes.add(1, &[]);
    }

    /// Record a token refresh (no-op)
    #[cfg(not(feature = "metrics"))]
    pub fn record_token_refresh(&self) {}
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("enabled", &cfg!(feature = "metrics"))
            .finish()
    }
}

/// Global telemetry instance holder
#[cfg(feature = "metrics")]
static TELEMETRY: std::sync::OnceLock<Arc<Metrics>> = std::sync::OnceLock::new();

/// Initialize global telemetry
#[cfg(feature = "metrics")]
pub fn init_telemetry(config: TelemetryConfig) -> Arc<Metrics> {
    TELEMETRY
        .get_or_init(|| Arc::new(Metrics::new(&config)))
        .clone()
}

/// Get global telemetry instance
#[cfg(feature = "metrics")]
pub fn telemetry() -> Option<Arc<Metrics>> {
    TELEMETRY.get().cloned()
}

/// Metrics for a new client: the shared global instance when enabled
pub(crate) fn metrics_for(config: &TelemetryConfig) -> Arc<Metrics> {
    #[cfg(feature = "metrics")]
    if config.enabled {
        return init_telemetry(config.clone());
    }

    Arc::new(Metrics::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_config_default() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.service_name, "credhub-sdk");
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = metrics_for(&TelemetryConfig::default());
        metrics.record_request("GET", "/api/v1/data", 200, 0.01);
        metrics.record_request("DELETE", "/api/v1/data", 500, 0.02);
        metrics.record_transport_error("GET", "/info");
        metrics.record_token_refresh();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn test_global_telemetry() {
        let config = TelemetryConfig {
            enabled: true,
            ..Default::default()
        };

        let metrics = metrics_for(&config);
        let global = telemetry().unwrap();
        assert!(Arc::ptr_eq(&metrics, &global));
    }
}
