//! Domain layer - molecules, predictions and their errors

pub mod error;
pub mod molecule;
pub mod prediction;

pub use error::DomainError;
pub use molecule::{depict_smiles, from_smiles, DepictionOptions, Molecule, SmilesError};
pub use prediction::{
    render, Canonicalizer, NormalizedMolecule, PredictionOutcome, PredictionPayload, Predictor,
    RedoxPotentials, RenderedResult,
};
