use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::finish_call;
use crate::domain::{Canonicalizer, DomainError, NormalizedMolecule};
use crate::infrastructure::http::HttpClientTrait;

pub const DEFAULT_CANONICALIZER_URL: &str =
    "https://smilesapi.politepond-2510b4f8.francecentral.azurecontainerapps.io:443/transform-smiles";

const SERVICE: &str = "canonicalizer";
const API_KEY_HEADER: &str = "SMILES_API_KEY";

/// Client for the SMILES canonicalization service
#[derive(Debug)]
pub struct RemoteCanonicalizer<C: HttpClientTrait> {
    client: C,
    token: String,
    url: String,
}

impl<C: HttpClientTrait> RemoteCanonicalizer<C> {
    pub fn new(client: C, token: impl Into<String>) -> Self {
        Self::with_url(client, token, DEFAULT_CANONICALIZER_URL)
    }

    pub fn with_url(client: C, token: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            url: url.into(),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![(API_KEY_HEADER, self.token.as_str())]
    }

    /// Reads the `smiles` field; absent, null or non-string values mean rejection
    fn parse_response(&self, json: Value) -> Result<NormalizedMolecule, DomainError> {
        let object = json.as_object().ok_or_else(|| {
            DomainError::upstream(SERVICE, format!("Expected a JSON object, got: {}", json))
        })?;

        match object.get("smiles") {
            Some(Value::String(smiles)) => Ok(NormalizedMolecule::new(smiles.as_str())),
            Some(Value::Null) | None => Ok(NormalizedMolecule::default()),
            Some(other) => {
                warn!(value = %other, "Canonicalizer returned a non-string molecule");
                Ok(NormalizedMolecule::default())
            }
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> Canonicalizer for RemoteCanonicalizer<C> {
    async fn canonicalize(&self, smiles: &str) -> Result<NormalizedMolecule, DomainError> {
        debug!(url = %self.url, "Requesting canonical SMILES");

        let started = Instant::now();
        let result = self
            .client
            .post_json(&self.url, self.headers(), &json!({ "smiles": smiles }))
            .await;
        let response = finish_call(SERVICE, started, result)?;

        self.parse_response(response)
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::{HttpClient, MockHttpClient};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_URL: &str = "http://canonicalizer.test/transform-smiles";

    #[tokio::test]
    async fn test_canonicalize_sends_key_and_body() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!({"smiles": "[C][C][O]"}));
        let canonicalizer = RemoteCanonicalizer::with_url(client, "smiles-key", TEST_URL);

        let normalized = canonicalizer.canonicalize("CCO").await.unwrap();
        assert_eq!(normalized.as_str(), "[C][C][O]");

        let requests = canonicalizer.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, TEST_URL);
        assert_eq!(requests[0].body, json!({"smiles": "CCO"}));
        assert_eq!(
            requests[0].headers,
            vec![("SMILES_API_KEY".to_string(), "smiles-key".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_field_is_rejection() {
        for response in [json!({}), json!({"smiles": null}), json!({"smiles": ""}), json!({"smiles": 5})] {
            let client = MockHttpClient::new().with_response(TEST_URL, response);
            let canonicalizer = RemoteCanonicalizer::with_url(client, "key", TEST_URL);

            assert!(canonicalizer.canonicalize("xyz").await.unwrap().is_rejected());
        }
    }

    #[tokio::test]
    async fn test_non_object_response_is_fault() {
        let client = MockHttpClient::new().with_response(TEST_URL, json!(["C"]));
        let canonicalizer = RemoteCanonicalizer::with_url(client, "key", TEST_URL);

        let err = canonicalizer.canonicalize("C").await.unwrap_err();
        assert!(matches!(err, DomainError::Upstream { ref service, .. } if service == "canonicalizer"));
    }

    #[tokio::test]
    async fn test_transport_error_names_service() {
        let client = MockHttpClient::new().with_error(TEST_URL, "connection refused");
        let canonicalizer = RemoteCanonicalizer::with_url(client, "key", TEST_URL);

        let err = canonicalizer.canonicalize("C").await.unwrap_err();
        assert_eq!(err.to_string(), "Upstream error: canonicalizer - connection refused");
    }

    #[tokio::test]
    async fn test_default_endpoint() {
        let canonicalizer = RemoteCanonicalizer::new(MockHttpClient::new(), "key");
        assert_eq!(canonicalizer.endpoint(), DEFAULT_CANONICALIZER_URL);
    }

    #[tokio::test]
    async fn test_against_http_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transform-smiles"))
            .and(header("SMILES_API_KEY", "secret"))
            .and(body_json(json!({"smiles": "c1ccccc1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"smiles": "[c][c][c][c][c][c][Ring1][=Branch1]"})))
            .expect(1)
            .mount(&server)
            .await;

        let canonicalizer = RemoteCanonicalizer::with_url(
            HttpClient::new(),
            "secret",
            format!("{}/transform-smiles", server.uri()),
        );

        let normalized = canonicalizer.canonicalize("c1ccccc1").await.unwrap();
        assert_eq!(normalized.as_str(), "[c][c][c][c][c][c][Ring1][=Branch1]");
    }

    #[tokio::test]
    async fn test_unauthorized_is_upstream_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let canonicalizer = RemoteCanonicalizer::with_url(HttpClient::new(), "wrong", server.uri());
        let err = canonicalizer.canonicalize("CCO").await.unwrap_err();

        assert!(matches!(err, DomainError::Upstream { ref service, .. } if service == "canonicalizer"));
        assert!(err.to_string().contains("403"));
    }
}
