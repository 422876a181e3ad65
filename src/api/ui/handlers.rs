//! Page handlers: the sample on load, the submitted molecule on POST

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::{error, warn};

use super::page::{render_error_page, render_page, ResultBlock};
use crate::api::middleware::truncate_for_log;
use crate::api::state::AppState;
use crate::domain::{render, DomainError, PredictionOutcome};

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub smiles: String,
}

/// A hard fault rendered as an error page
pub struct PageError(DomainError);

impl From<DomainError> for PageError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        error!(error = %self.0, status = %status.as_u16(), "Prediction page failed");

        (status, Html(render_error_page(&self.0.to_string()))).into_response()
    }
}

/// GET / - page showing the sample molecule's result
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let molecule = state.ui.default_molecule.clone();
    show(&state, &molecule).await
}

/// POST /predict - page showing the submitted molecule's result
pub async fn predict(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Result<Html<String>, PageError> {
    // the submitted text is the memo key and is forwarded untouched
    let molecule = if form.smiles.is_empty() {
        state.ui.default_molecule.as_str()
    } else {
        form.smiles.as_str()
    };

    show(&state, molecule).await
}

async fn show(state: &AppState, molecule: &str) -> Result<Html<String>, PageError> {
    let block = match state.prediction_service.predict(molecule).await? {
        PredictionOutcome::Invalid => {
            warn!(smiles = %truncate_for_log(molecule, 80), "Rejected molecule");
            ResultBlock::Invalid
        }
        PredictionOutcome::Predicted(payload) => {
            ResultBlock::Rendered(render(&payload, molecule, &state.depiction)?)
        }
    };

    Ok(Html(render_page(molecule, &block, state.ui.max_smiles_length)))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        routing::{get, post},
        Router,
    };
    use std::sync::Arc;

    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::api::state::mock::{state_with, MockPredictionService};
    use crate::api::ui::page::INVALID_SMILES_NOTICE;
    use crate::config::{UiConfig, DEFAULT_MOLECULE};
    use crate::domain::prediction::{MockCanonicalizer, MockPredictor};
    use crate::domain::{NormalizedMolecule, PredictionPayload};
    use crate::infrastructure::cache::PredictionCache;
    use crate::infrastructure::services::{PredictionService, PredictionServiceTrait};

    fn sample_outcome() -> PredictionOutcome {
        PredictionOutcome::Predicted(PredictionPayload::new(json!({
            "voltages": 1.23456,
            "ox/red": [6.1, -1.0004]
        })))
    }

    fn app(service: MockPredictionService) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/predict", post(predict))
            .with_state(state_with(service))
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form(body: &str) -> Request<Body> {
        Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_shows_sample() {
        let service = MockPredictionService::new().with_outcome(DEFAULT_MOLECULE, sample_outcome());

        let response = app(service)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("1.235 V vs. Li/Li⁺"));
        assert!(html.contains("6.1 V (ref to vacuum)"));
        assert!(html.contains("-1.0 V (ref to vacuum)"));
        assert!(html.contains("<svg"));
    }

    #[tokio::test]
    async fn test_submitted_molecule() {
        let service = MockPredictionService::new().with_outcome("CCO", sample_outcome());

        let response = app(service).oneshot(form("smiles=CCO")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("value=\"CCO\""));
        assert!(html.contains("Lithium insertion potential"));
    }

    #[tokio::test]
    async fn test_empty_submission_uses_sample() {
        let service = MockPredictionService::new().with_outcome(DEFAULT_MOLECULE, sample_outcome());

        let response = app(service).oneshot(form("smiles=")).await.unwrap();

        let html = body_text(response).await;
        assert!(html.contains(&format!("value=\"{}\"", DEFAULT_MOLECULE)));
        assert!(html.contains("1.235"));
    }

    #[tokio::test]
    async fn test_invalid_notice() {
        let service = MockPredictionService::new().with_outcome("xyz", PredictionOutcome::Invalid);

        let response = app(service).oneshot(form("smiles=xyz")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(INVALID_SMILES_NOTICE));
        assert!(!html.contains("<svg"));
    }

    #[tokio::test]
    async fn test_upstream_fault_is_bad_gateway() {
        let service = MockPredictionService::new()
            .with_error("CCO", DomainError::upstream("canonicalizer", "Request timed out"));

        let response = app(service).oneshot(form("smiles=CCO")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_unparseable_molecule_is_server_error() {
        let service = MockPredictionService::new().with_outcome("C1CC", sample_outcome());

        let response = app(service).oneshot(form("smiles=C1CC")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_text(response).await;
        assert!(!html.contains("Lithium insertion potential"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_server_error() {
        let outcome = PredictionOutcome::Predicted(PredictionPayload::new(json!({"voltages": []})));
        let service = MockPredictionService::new().with_outcome("CCO", outcome);

        let response = app(service).oneshot(form("smiles=CCO")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_submitted_text_is_the_cache_key() {
        let mut canonicalizer = MockCanonicalizer::new();
        canonicalizer
            .expect_canonicalize()
            .withf(|smiles| smiles.to_string() == "CCO" || smiles.to_string() == " CCO")
            .times(2)
            .returning(|_| Ok(NormalizedMolecule::new("[C][C][O]")));

        let mut predictor = MockPredictor::new();
        predictor.expect_predict().times(2).returning(|_| {
            Ok(PredictionPayload::new(json!({"voltages": 1.23456, "ox/red": [6.1, -1.0004]})))
        });

        let service = Arc::new(PredictionService::new(
            Arc::new(canonicalizer),
            Arc::new(predictor),
            PredictionCache::new(),
        ));
        let app = Router::new()
            .route("/predict", post(predict))
            .with_state(AppState::new(service.clone(), UiConfig::default()));

        let plain = app.clone().oneshot(form("smiles=CCO")).await.unwrap();
        let padded = app.clone().oneshot(form("smiles=+CCO")).await.unwrap();
        let repeated = app.oneshot(form("smiles=CCO")).await.unwrap();

        assert_eq!(plain.status(), StatusCode::OK);
        assert_eq!(padded.status(), StatusCode::OK);
        assert_eq!(repeated.status(), StatusCode::OK);
        assert_eq!(service.cached_entries().await, 2);

        let html = body_text(padded).await;
        assert!(html.contains("value=\" CCO\""));
        assert!(html.contains("1.235 V vs. Li/Li⁺"));
    }

    #[tokio::test]
    async fn test_whitespace_only_submission_is_forwarded() {
        let service = MockPredictionService::new().with_outcome("  ", PredictionOutcome::Invalid);

        let response = app(service).oneshot(form("smiles=++")).await.unwrap();

        let html = body_text(response).await;
        assert!(html.contains(INVALID_SMILES_NOTICE));
        assert!(!html.contains(&format!("value=\"{}\"", DEFAULT_MOLECULE)));
    }
}
