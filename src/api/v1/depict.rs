//! Structure depiction endpoint handler

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::api::state::AppState;
use crate::api::types::{ApiError, DepictQuery};
use crate::domain::depict_smiles;

/// GET /v1/depict?smiles=...
pub async fn depict(
    State(state): State<AppState>,
    Query(query): Query<DepictQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let svg = depict_smiles(query.smiles.trim(), &state.depiction)
        .map_err(crate::domain::DomainError::from)?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
