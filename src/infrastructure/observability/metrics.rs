//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Handle backed by a recorder that is not installed globally
    #[cfg(test)]
    pub fn detached() -> Self {
        Self {
            handle: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("anima_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one call to a remote prediction service
pub fn record_upstream_request(service: &'static str, success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };

    counter!("anima_upstream_requests_total", "service" => service, "status" => status)
        .increment(1);
    histogram!("anima_upstream_request_duration_seconds", "service" => service)
        .record(duration.as_secs_f64());
}

/// Record a memo cache lookup
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("anima_cache_lookups_total", "result" => result).increment(1);
}

/// Record the outcome of a prediction: `predicted`, `invalid` or `error`
pub fn record_prediction(outcome: &'static str) {
    counter!("anima_predictions_total", "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_http_request("GET", "/", 200, Duration::from_millis(3));
        record_upstream_request("canonicalizer", true, Duration::from_millis(10));
        record_cache_lookup(false);
        record_prediction("invalid");
    }

    #[test]
    fn test_detached_handle_renders() {
        let metrics = PrometheusMetrics::detached();
        assert!(!metrics.render().contains("anima_info"));
    }
}
