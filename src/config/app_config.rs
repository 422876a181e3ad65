use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DepictionOptions, DomainError};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::prediction::{DEFAULT_CANONICALIZER_URL, DEFAULT_PREDICTOR_URL};

/// Sample molecule shown when nothing has been submitted (terephthalic acid)
pub const DEFAULT_MOLECULE: &str = "C1=CC(=CC=C1C(=O)O)C(=O)O";

/// Environment variable holding the canonicalizer key
pub const SMILES_TOKEN_VAR: &str = "SMILES_TOKEN";

/// Environment variable holding the predictor bearer token
pub const KERNEL_TOKEN_VAR: &str = "KERNEL_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Remote service endpoints and credentials
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_canonicalizer")]
    pub canonicalizer: EndpointConfig,
    #[serde(default = "default_predictor")]
    pub predictor: EndpointConfig,
    /// Upper bound for each remote call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: String,
    #[serde(default)]
    pub token: String,
}

// tokens stay out of logs
impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("token", &if self.token.is_empty() { "<empty>" } else { "<redacted>" })
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Page and depiction settings
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_molecule")]
    pub default_molecule: String,
    /// Informational only; longer input is still accepted
    #[serde(default = "default_max_smiles_length")]
    pub max_smiles_length: usize,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_depiction_width")]
    pub depiction_width: u32,
    #[serde(default = "default_depiction_height")]
    pub depiction_height: u32,
}

fn default_canonicalizer() -> EndpointConfig {
    EndpointConfig {
        url: DEFAULT_CANONICALIZER_URL.to_string(),
        token: String::new(),
    }
}

fn default_predictor() -> EndpointConfig {
    EndpointConfig {
        url: DEFAULT_PREDICTOR_URL.to_string(),
        token: String::new(),
    }
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_molecule() -> String {
    DEFAULT_MOLECULE.to_string()
}

fn default_max_smiles_length() -> usize {
    54
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_depiction_width() -> u32 {
    350
}

fn default_depiction_height() -> u32 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            canonicalizer: default_canonicalizer(),
            predictor: default_predictor(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_molecule: default_molecule(),
            max_smiles_length: default_max_smiles_length(),
            static_dir: default_static_dir(),
            depiction_width: default_depiction_width(),
            depiction_height: default_depiction_height(),
        }
    }
}

impl ServicesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UiConfig {
    pub fn depiction_options(&self) -> DepictionOptions {
        DepictionOptions {
            width: self.depiction_width,
            height: self.depiction_height,
            ..DepictionOptions::default()
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.fill_tokens(
            std::env::var(SMILES_TOKEN_VAR).ok(),
            std::env::var(KERNEL_TOKEN_VAR).ok(),
        );

        Ok(app_config)
    }

    /// Fills tokens not set through the layered sources from the plain
    /// `SMILES_TOKEN` / `KERNEL_TOKEN` variables
    pub fn fill_tokens(&mut self, smiles_token: Option<String>, kernel_token: Option<String>) {
        if self.services.canonicalizer.token.is_empty() {
            if let Some(token) = smiles_token {
                self.services.canonicalizer.token = token;
            }
        }

        if self.services.predictor.token.is_empty() {
            if let Some(token) = kernel_token {
                self.services.predictor.token = token;
            }
        }
    }

    /// Rejects settings the server cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        let endpoints = [
            ("canonicalizer", &self.services.canonicalizer, SMILES_TOKEN_VAR),
            ("predictor", &self.services.predictor, KERNEL_TOKEN_VAR),
        ];

        for (name, endpoint, variable) in endpoints {
            if endpoint.url.trim().is_empty() {
                return Err(DomainError::configuration(format!(
                    "services.{}.url must not be empty",
                    name
                )));
            }

            if endpoint.token.trim().is_empty() {
                return Err(DomainError::configuration(format!(
                    "services.{}.token is empty; set {} or APP__SERVICES__{}__TOKEN",
                    name,
                    variable,
                    name.to_uppercase()
                )));
            }
        }

        if self.services.timeout_secs == 0 {
            return Err(DomainError::configuration(
                "services.timeout_secs must be greater than zero",
            ));
        }

        if self.ui.depiction_width == 0 || self.ui.depiction_height == 0 {
            return Err(DomainError::configuration(
                "ui.depiction_width and ui.depiction_height must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> AppConfig {
        let mut config = AppConfig::default();
        config.fill_tokens(Some("smiles-key".to_string()), Some("kernel-key".to_string()));
        config
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.services.timeout(), Duration::from_secs(300));
        assert_eq!(config.services.canonicalizer.url, DEFAULT_CANONICALIZER_URL);
        assert_eq!(config.ui.default_molecule, DEFAULT_MOLECULE);
        assert_eq!(config.ui.max_smiles_length, 54);
        assert!(config.cache.enabled);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_empty_tokens_are_rejected() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("SMILES_TOKEN"));

        let mut config = AppConfig::default();
        config.fill_tokens(Some("key".to_string()), None);
        assert!(config.validate().unwrap_err().to_string().contains("KERNEL_TOKEN"));
    }

    #[test]
    fn test_valid_configuration() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_layered_tokens_win_over_plain_variables() {
        let mut config = AppConfig::default();
        config.services.predictor.token = "from-app-config".to_string();
        config.fill_tokens(Some("a".to_string()), Some("b".to_string()));

        assert_eq!(config.services.canonicalizer.token, "a");
        assert_eq!(config.services.predictor.token, "from-app-config");
    }

    #[test]
    fn test_invalid_values() {
        let mut config = configured();
        config.services.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = configured();
        config.services.predictor.url = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = configured();
        config.ui.depiction_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tokens_are_redacted_in_debug() {
        let rendered = format!("{:?}", configured().services);
        assert!(!rendered.contains("smiles-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "services": {"predictor": {"url": "http://localhost:9000/predict", "token": "t"}},
            "ui": {"depiction_width": 500},
            "logging": {"level": "debug", "format": "json"}
        }))
        .unwrap();

        assert_eq!(config.services.predictor.url, "http://localhost:9000/predict");
        assert_eq!(config.services.canonicalizer.url, DEFAULT_CANONICALIZER_URL);
        assert_eq!(config.ui.depiction_options().width, 500);
        assert_eq!(config.ui.depiction_options().height, 300);
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
