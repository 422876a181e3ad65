//! Seams for the two remote services

use async_trait::async_trait;

use super::{NormalizedMolecule, PredictionPayload};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Normalizes a raw SMILES string into the representation the predictor expects
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Canonicalizer: Send + Sync {
    /// Returns an empty molecule when the service rejects the input.
    /// Transport and decoding failures are errors.
    async fn canonicalize(&self, smiles: &str) -> Result<NormalizedMolecule, DomainError>;

    /// Endpoint description for readiness reporting
    fn endpoint(&self) -> String;
}

/// Runs the prediction model on a normalized molecule
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, molecule: &NormalizedMolecule) -> Result<PredictionPayload, DomainError>;

    fn endpoint(&self) -> String;
}
