//! Prediction endpoint handler

use axum::{extract::State, http::StatusCode};
use tracing::debug;

use crate::api::middleware::truncate_for_log;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PredictRequest, PredictResponse};
use crate::domain::{render, PredictionOutcome};

pub const INVALID_SMILES_MESSAGE: &str = "Ops! It seems you have an invalid SMILES";

/// POST /v1/predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let smiles = request.smiles.as_str();
    if smiles.is_empty() {
        return Err(ApiError::bad_request("smiles must not be empty").with_param("smiles"));
    }

    debug!(smiles = %truncate_for_log(smiles, 80), "Predicting molecule");

    let outcome = state.prediction_service.predict(smiles).await?;

    match outcome {
        PredictionOutcome::Invalid => Err(ApiError::invalid_molecule(
            StatusCode::UNPROCESSABLE_ENTITY,
            INVALID_SMILES_MESSAGE,
        )),
        PredictionOutcome::Predicted(payload) => {
            let rendered = render(&payload, smiles, &state.depiction)?;
            Ok(Json(PredictResponse::from(rendered)))
        }
    }
}
