use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::finish_call;
use crate::domain::{DomainError, NormalizedMolecule, PredictionPayload, Predictor};
use crate::infrastructure::http::HttpClientTrait;

pub const DEFAULT_PREDICTOR_URL: &str =
    "https://animakernel.politepond-2510b4f8.francecentral.azurecontainerapps.io:443/predict";

const SERVICE: &str = "predictor";

/// Client for the redox potential prediction service
#[derive(Debug)]
pub struct RemotePredictor<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    url: String,
}

impl<C: HttpClientTrait> RemotePredictor<C> {
    pub fn new(client: C, token: impl Into<String>) -> Self {
        Self::with_url(client, token, DEFAULT_PREDICTOR_URL)
    }

    pub fn with_url(client: C, token: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", token.into()),
            url: url.into(),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![("Authorization", self.auth_header.as_str())]
    }
}

#[async_trait]
impl<C: HttpClientTrait> Predictor for RemotePredictor<C> {
    async fn predict(&self, molecule: &NormalizedMolecule) -> Result<PredictionPayload, DomainError> {
        debug!(url = %self.url, "Requesting prediction");

        let started = Instant::now();
        let result = self
            .client
            .post_json(&self.url, self.headers(), &json!({ "smiles": molecule.as_str() }))
            .await;

        finish_call(SERVICE, started, result).map(PredictionPayload::new)
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}
