use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

/// HTTP plumbing below the request span. It stays at warn so a debug level
/// shows canonicalizer and predictor traffic rather than connection pooling.
const QUIET_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "h2=warn", "reqwest=warn"];

/// Directives for the configured level: this crate and the request trace
/// follow it, the HTTP stack underneath does not.
fn directives(level: &str) -> String {
    let mut directives = vec![
        level.to_string(),
        format!("anima_web={}", level),
        format!("tower_http={}", level),
    ];
    directives.extend(QUIET_TARGETS.iter().map(|target| target.to_string()));
    directives.join(",")
}

/// `RUST_LOG`, when present and parseable, replaces the configured directives
fn build_filter(level: &str, env: Option<&str>) -> EnvFilter {
    env.and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_new(directives(level)).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Installs the global subscriber for the server
pub fn init_logging(config: &LoggingConfig) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config.level, env.as_deref());

    // `TraceLayer` opens request spans at debug; closing one logs its latency
    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_span_events(FmtSpan::CLOSE))
            .init(),
    }

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        from_env = env.is_some(),
        "Logging initialized"
    );
}
