//! Values exchanged between the remote services and the renderer

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

/// Payload field holding the lithium insertion potential
pub const LITHIUM_INSERTION_FIELD: &str = "voltages";

/// Payload field holding `[oxidation, reduction]`
pub const REDOX_FIELD: &str = "ox/red";

/// Molecule as returned by the canonicalizer service.
///
/// The empty string is the canonicalizer's way of rejecting an input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedMolecule(String);

impl NormalizedMolecule {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_rejected(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedMolecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded predictor response, kept exactly as received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionPayload(Value);

impl PredictionPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Result of running a molecule through both services
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// The canonicalizer returned an empty molecule; the predictor was not called
    Invalid,
    Predicted(PredictionPayload),
}

impl PredictionOutcome {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    pub fn payload(&self) -> Option<&PredictionPayload> {
        match self {
            Self::Invalid => None,
            Self::Predicted(payload) => Some(payload),
        }
    }

    /// Label used in metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Predicted(_) => "predicted",
        }
    }
}

/// Predicted potentials in volts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RedoxPotentials {
    /// Versus Li/Li+
    pub lithium_insertion: f64,
    /// Referenced to vacuum
    pub oxidation: f64,
    /// Referenced to vacuum
    pub reduction: f64,
}

impl RedoxPotentials {
    /// Extracts the three potentials from a predictor payload.
    ///
    /// Values may be JSON numbers or numeric strings. Anything else, a missing
    /// field or an `ox/red` array shorter than two is a payload error.
    pub fn from_payload(payload: &PredictionPayload) -> Result<Self, DomainError> {
        let value = payload.as_value();

        let insertion = value.get(LITHIUM_INSERTION_FIELD).ok_or_else(|| {
            DomainError::payload(format!("missing field '{}'", LITHIUM_INSERTION_FIELD))
        })?;

        let redox = value
            .get(REDOX_FIELD)
            .ok_or_else(|| DomainError::payload(format!("missing field '{}'", REDOX_FIELD)))?
            .as_array()
            .ok_or_else(|| DomainError::payload(format!("field '{}' is not an array", REDOX_FIELD)))?;

        if redox.len() < 2 {
            return Err(DomainError::payload(format!(
                "field '{}' has {} element(s), expected 2",
                REDOX_FIELD,
                redox.len()
            )));
        }

        Ok(Self {
            lithium_insertion: numeric(insertion, LITHIUM_INSERTION_FIELD)?,
            oxidation: numeric(&redox[0], "ox/red[0]")?,
            reduction: numeric(&redox[1], "ox/red[1]")?,
        })
    }

    /// Each potential rounded to three decimals
    pub fn rounded(&self) -> Self {
        Self {
            lithium_insertion: round_potential(self.lithium_insertion),
            oxidation: round_potential(self.oxidation),
            reduction: round_potential(self.reduction),
        }
    }
}

fn numeric(value: &Value, field: &str) -> Result<f64, DomainError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| DomainError::payload(format!("field '{}' is not numeric: {}", field, value)))
}

/// Rounds the exact binary value to three decimal places, ties to even
pub fn round_potential(value: f64) -> f64 {
    format!("{:.3}", value).parse::<f64>().unwrap_or(value)
}

/// Shortest representation that round-trips, keeping `.0` on integral values
pub fn format_potential(value: f64) -> String {
    format!("{:?}", value)
}
