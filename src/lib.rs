//! Anima web front-end
//!
//! Takes a SMILES molecule, normalizes it through a remote canonicalizer,
//! asks a remote model for its lithium insertion and redox potentials, and
//! renders the values next to a 2D depiction of the structure.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    cache::PredictionCache,
    http::HttpClient,
    prediction::{RemoteCanonicalizer, RemotePredictor},
    services::PredictionService,
};
use tracing::info;

/// Create the application state from validated configuration
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let client = HttpClient::with_timeout(config.services.timeout())?;

    let canonicalizer = RemoteCanonicalizer::with_url(
        client.clone(),
        config.services.canonicalizer.token.clone(),
        config.services.canonicalizer.url.clone(),
    );
    let predictor = RemotePredictor::with_url(
        client,
        config.services.predictor.token.clone(),
        config.services.predictor.url.clone(),
    );

    let cache = if config.cache.enabled {
        PredictionCache::new()
    } else {
        info!("Prediction memoization disabled");
        PredictionCache::disabled()
    };

    let service = PredictionService::new(Arc::new(canonicalizer), Arc::new(predictor), cache);

    info!(
        canonicalizer = %config.services.canonicalizer.url,
        predictor = %config.services.predictor.url,
        timeout_secs = config.services.timeout_secs,
        "Prediction service initialized"
    );

    Ok(AppState::new(Arc::new(service), config.ui.clone()))
}
