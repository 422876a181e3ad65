//! Remote clients for the canonicalizer and predictor services

mod canonicalizer;
mod predictor;

pub use canonicalizer::{RemoteCanonicalizer, DEFAULT_CANONICALIZER_URL};
pub use predictor::{RemotePredictor, DEFAULT_PREDICTOR_URL};

use std::time::Instant;

use crate::domain::DomainError;
use crate::infrastructure::observability::record_upstream_request;

/// Attributes an HTTP error to the named service and records the call
fn finish_call<T>(
    service: &'static str,
    started: Instant,
    result: Result<T, DomainError>,
) -> Result<T, DomainError> {
    record_upstream_request(service, result.is_ok(), started.elapsed());

    result.map_err(|e| match e {
        DomainError::Upstream { message, .. } => DomainError::upstream(service, message),
        other => other,
    })
}
