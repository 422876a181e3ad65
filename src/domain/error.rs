use thiserror::Error;

use super::molecule::SmilesError;

/// Core domain errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Upstream error: {service} - {message}")]
    Upstream { service: String, message: String },

    #[error("Malformed prediction payload: {message}")]
    Payload { message: String },

    #[error("Molecule error: {0}")]
    Molecule(#[from] SmilesError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn payload(message: impl Into<String>) -> Self {
        Self::Payload {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the fault originated outside this process (network, upstream status, decoding)
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error() {
        let error = DomainError::upstream("canonicalizer", "HTTP 401 Unauthorized: bad key");
        assert_eq!(
            error.to_string(),
            "Upstream error: canonicalizer - HTTP 401 Unauthorized: bad key"
        );
        assert!(error.is_upstream());
    }

    #[test]
    fn test_payload_error() {
        let error = DomainError::payload("missing field 'voltages'");
        assert_eq!(
            error.to_string(),
            "Malformed prediction payload: missing field 'voltages'"
        );
        assert!(!error.is_upstream());
    }

    #[test]
    fn test_molecule_error_conversion() {
        let error: DomainError = SmilesError::Empty.into();
        assert!(matches!(error, DomainError::Molecule(SmilesError::Empty)));
        assert_eq!(error.to_string(), "Molecule error: empty SMILES string");
    }

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("predictor token is empty");
        assert_eq!(
            error.to_string(),
            "Configuration error: predictor token is empty"
        );
        assert!(!error.is_upstream());
    }
}
