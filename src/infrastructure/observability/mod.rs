//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_http_request,
    record_prediction, record_upstream_request, PrometheusMetrics,
};
