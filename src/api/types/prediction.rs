//! Request and response bodies for the prediction API

use serde::{Deserialize, Serialize};

use crate::domain::prediction::PotentialReading;
use crate::domain::{RedoxPotentials, RenderedResult};

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub smiles: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub molecule: String,
    /// Volts, rounded to three decimals
    pub potentials: RedoxPotentials,
    pub readings: Vec<PotentialReading>,
    pub depiction_svg: String,
}

impl From<RenderedResult> for PredictResponse {
    fn from(result: RenderedResult) -> Self {
        let readings = result.readings().to_vec();

        Self {
            molecule: result.molecule,
            potentials: result.potentials,
            readings,
            depiction_svg: result.depiction_svg,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepictQuery {
    pub smiles: String,
}
