//! Application state for shared services

use std::sync::Arc;

use crate::config::UiConfig;
use crate::domain::DepictionOptions;
use crate::infrastructure::services::PredictionServiceTrait;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub prediction_service: Arc<dyn PredictionServiceTrait>,
    pub ui: Arc<UiConfig>,
    pub depiction: Arc<DepictionOptions>,
}

impl AppState {
    pub fn new(prediction_service: Arc<dyn PredictionServiceTrait>, ui: UiConfig) -> Self {
        let depiction = Arc::new(ui.depiction_options());

        Self {
            prediction_service,
            ui: Arc::new(ui),
            depiction,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("prediction_service", &self.prediction_service)
            .field("ui", &self.ui)
            .finish()
    }
}

#[cfg(test)]
pub mod mock {
    //! Canned prediction service for handler tests

    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{DomainError, PredictionOutcome};
    use crate::infrastructure::services::ServiceEndpoints;

    #[derive(Debug, Default)]
    pub struct MockPredictionService {
        outcomes: HashMap<String, Result<PredictionOutcome, DomainError>>,
    }

    impl MockPredictionService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_outcome(mut self, smiles: impl Into<String>, outcome: PredictionOutcome) -> Self {
            self.outcomes.insert(smiles.into(), Ok(outcome));
            self
        }

        pub fn with_error(mut self, smiles: impl Into<String>, error: DomainError) -> Self {
            self.outcomes.insert(smiles.into(), Err(error));
            self
        }
    }

    #[async_trait]
    impl PredictionServiceTrait for MockPredictionService {
        async fn predict(&self, smiles: &str) -> Result<PredictionOutcome, DomainError> {
            self.outcomes
                .get(smiles)
                .cloned()
                .unwrap_or(Ok(PredictionOutcome::Invalid))
        }

        async fn cached_entries(&self) -> u64 {
            self.outcomes.len() as u64
        }

        fn endpoints(&self) -> ServiceEndpoints {
            ServiceEndpoints {
                canonicalizer: "http://canonicalizer.test/transform-smiles".to_string(),
                predictor: "http://predictor.test/predict".to_string(),
            }
        }
    }

    /// State over a mock service with default UI settings
    pub fn state_with(service: MockPredictionService) -> AppState {
        AppState::new(Arc::new(service), UiConfig::default())
    }
}
