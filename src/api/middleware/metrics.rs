//! HTTP metrics middleware for recording request/response metrics

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::infrastructure::observability::record_http_request;

/// Middleware to record HTTP request metrics
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = metric_path(&request);

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

/// Route pattern when matched; unmatched paths collapse to one label
fn metric_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| {
            if request.uri().path().starts_with("/static/") {
                "/static".to_string()
            } else {
                "unmatched".to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_paths_are_collapsed() {
        let request = Request::get("/no/such/page").body(Body::empty()).unwrap();
        assert_eq!(metric_path(&request), "unmatched");

        let request = Request::get("/static/new_scheme.jpg").body(Body::empty()).unwrap();
        assert_eq!(metric_path(&request), "/static");
    }
}
