//! Request/response logging middleware with credential redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::info;

/// Logs each request and its outcome.
/// `TraceLayer` owns the span; this only emits events inside it.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);
    let headers_log = redact_headers(&request);

    info!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Set upstream by `SetRequestIdLayer`
fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| should_log_header(name.as_str()))
        .map(|(name, value)| {
            let value = if is_sensitive_header(name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name.as_str(), value)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Header names arrive lowercased from `http`
fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "smiles_api_key" | "cookie" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-forwarded-for"
            | "authorization"
            | "smiles_api_key"
    )
}

/// Truncate long strings for logging
pub fn truncate_for_log(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some((cut, _)) => format!(
            "{}...[truncated {} chars]",
            &s[..cut],
            s[cut..].chars().count()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sensitive_header() {
        assert!(is_sensitive_header("authorization"));
        assert!(is_sensitive_header("smiles_api_key"));
        assert!(!is_sensitive_header("content-type"));
    }

    #[test]
    fn test_redact_headers() {
        let request = Request::post("/v1/predict")
            .header("authorization", "Bearer kernel-secret")
            .header("content-type", "application/json")
            .header("etag", "abc")
            .body(Body::empty())
            .unwrap();

        let logged = redact_headers(&request);
        assert!(logged.contains("authorization=[REDACTED]"));
        assert!(logged.contains("content-type=application/json"));
        assert!(!logged.contains("kernel-secret"));
        assert!(!logged.contains("etag"));
    }

    #[test]
    fn test_request_id_fallback() {
        let request = Request::get("/").body(Body::empty()).unwrap();
        assert_eq!(extract_request_id(&request), "-");
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("CCO", 10), "CCO");

        let truncated = truncate_for_log("C1=CC(=CC=C1C(=O)O)C(=O)O", 10);
        assert!(truncated.starts_with("C1=CC(=CC="));
        assert!(truncated.contains("[truncated 15 chars]"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        assert_eq!(truncate_for_log("Li⁺Li⁺", 3), "Li⁺...[truncated 3 chars]");
    }
}
