//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, EndpointConfig, LogFormat, LoggingConfig, ServerConfig,
    ServicesConfig, UiConfig, DEFAULT_MOLECULE, KERNEL_TOKEN_VAR, SMILES_TOKEN_VAR,
};
