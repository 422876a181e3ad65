//! Prediction service - memoized canonicalize-then-predict pipeline

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{Canonicalizer, DomainError, PredictionOutcome, Predictor};
use crate::infrastructure::cache::PredictionCache;
use crate::infrastructure::observability::{record_cache_lookup, record_prediction};

/// Remote endpoints the service talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEndpoints {
    pub canonicalizer: String,
    pub predictor: String,
}

/// Trait for the prediction service (for dynamic dispatch in AppState)
#[async_trait]
pub trait PredictionServiceTrait: Send + Sync + Debug {
    /// Runs a molecule through both services, memoized by the literal input
    async fn predict(&self, smiles: &str) -> Result<PredictionOutcome, DomainError>;

    /// Number of memoized inputs
    async fn cached_entries(&self) -> u64;

    fn endpoints(&self) -> ServiceEndpoints;
}

pub struct PredictionService {
    canonicalizer: Arc<dyn Canonicalizer>,
    predictor: Arc<dyn Predictor>,
    cache: PredictionCache,
}

impl PredictionService {
    pub fn new(
        canonicalizer: Arc<dyn Canonicalizer>,
        predictor: Arc<dyn Predictor>,
        cache: PredictionCache,
    ) -> Self {
        Self {
            canonicalizer,
            predictor,
            cache,
        }
    }

    /// One uncached pass: canonicalize, stop on rejection, otherwise predict
    async fn run_model(&self, smiles: &str) -> Result<PredictionOutcome, DomainError> {
        let normalized = self.canonicalizer.canonicalize(smiles).await?;

        if normalized.is_rejected() {
            info!(smiles = %smiles, "Canonicalizer rejected molecule");
            return Ok(PredictionOutcome::Invalid);
        }

        let payload = self.predictor.predict(&normalized).await?;
        Ok(PredictionOutcome::Predicted(payload))
    }
}

impl Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("canonicalizer", &self.canonicalizer.endpoint())
            .field("predictor", &self.predictor.endpoint())
            .field("cache_enabled", &self.cache.is_enabled())
            .finish()
    }
}

#[async_trait]
impl PredictionServiceTrait for PredictionService {
    async fn predict(&self, smiles: &str) -> Result<PredictionOutcome, DomainError> {
        let result = self
            .cache
            .get_or_try_insert(smiles, self.run_model(smiles))
            .await;

        match result {
            Ok(memoized) => {
                record_cache_lookup(memoized.hit);
                record_prediction(memoized.value.kind());

                if memoized.hit {
                    debug!(smiles = %smiles, outcome = memoized.value.kind(), "Prediction served from cache");
                }

                Ok(memoized.value)
            }
            Err(e) => {
                record_cache_lookup(false);
                record_prediction("error");
                warn!(smiles = %smiles, error = %e, "Prediction failed");
                Err(e)
            }
        }
    }

    async fn cached_entries(&self) -> u64 {
        self.cache.len().await
    }

    fn endpoints(&self) -> ServiceEndpoints {
        ServiceEndpoints {
            canonicalizer: self.canonicalizer.endpoint(),
            predictor: self.predictor.endpoint(),
        }
    }
}
