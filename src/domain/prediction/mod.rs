//! Redox prediction domain: outcome types, service seams and the result renderer

mod entity;
mod provider;
mod render;

pub use entity::{
    format_potential, round_potential, NormalizedMolecule, PredictionOutcome, PredictionPayload,
    RedoxPotentials, LITHIUM_INSERTION_FIELD, REDOX_FIELD,
};
pub use provider::{Canonicalizer, Predictor};
pub use render::{render, PotentialReading, RenderedResult, LITHIUM_UNIT, VACUUM_UNIT};

#[cfg(test)]
pub use provider::{MockCanonicalizer, MockPredictor};
