//! OpenAI provider implementation
//!
//! Talks to the legacy `/completions` endpoint: one JSON POST per request,
//! the whole body read back as text and decoded into a
//! [`CompletionResponse`].

use crate::constants::OPENAI_PROVIDER_NAME;
use crate::error;
use crate::http::{create_headers, header, HttpClient, ReqwestClient};
use crate::openai::config::OpenAIConfig;
use async_trait::async_trait;
use kotoba_core::{Completer, CompletionRequest, CompletionResponse, Error};
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::debug;

/// OpenAI provider for text completions
///
/// # Example
///
/// ```no_run
/// use kotoba_providers::{OpenAI, OpenAIConfig};
/// use kotoba_providers::http::ReqwestClient;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), kotoba_core::Error> {
/// // Reads OPENAI_API_KEY and friends
/// let provider = OpenAI::from_env()?;
///
/// // Or with custom configuration and client
/// let config = OpenAIConfig::new("your-api-key").with_organization("org-id");
/// let client = Arc::new(ReqwestClient::new()?);
/// let provider = OpenAI::new(config, client);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenAI {
    client: Arc<dyn HttpClient>,
    config: OpenAIConfig,
}

impl OpenAI {
    /// Create a new OpenAI provider with the given configuration and client
    pub fn new(config: OpenAIConfig, client: Arc<dyn HttpClient>) -> Self {
        Self { client, config }
    }

    /// Create a provider with the default reqwest client
    pub fn with_config(config: OpenAIConfig) -> Result<Self, Error> {
        let client = Arc::new(ReqwestClient::new()?);
        Ok(Self::new(config, client))
    }

    /// Create a new OpenAI provider with just an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    /// Create a provider configured from the environment
    pub fn from_env() -> Result<Self, Error> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    /// The active configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    fn headers(&self) -> Result<HeaderMap, Error> {
        let additional = self
            .config
            .organization_id
            .as_deref()
            .map(|org| header("openai-organization", org))
            .transpose()?;
        create_headers(&self.config.api_key, additional)
    }
}

#[async_trait]
impl Completer for OpenAI {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, Error> {
        let body = serde_json::to_value(&request)?;
        let headers = self.headers()?;

        let http = self
            .client
            .post(&self.config.completions_url(), headers, body)
            .await?;

        if !http.is_success() {
            return Err(error::status_error(
                OPENAI_PROVIDER_NAME,
                http.status,
                http.body,
            ));
        }

        let response: CompletionResponse =
            serde_json::from_str(&http.body).map_err(|e| error::malformed_response(&e))?;
        debug!(
            id = %response.id,
            choices = response.choices.len(),
            "decoded completion response"
        );
        Ok(response)
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio_test::assert_ok;
    use wiremock::matchers::{body_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAI {
        let config = OpenAIConfig::new("sk-test").with_base_url(format!("{}/v1", server.uri()));
        OpenAI::with_config(config).unwrap()
    }

    fn completion_body(text: &str) -> serde_json::Value {
        json!({
            "id": "cmpl-1",
            "object": "text_completion",
            "created": 1_700_000_000,
            "model": "text-davinci-003",
            "choices": [
                { "text": text, "index": 0, "logprobs": null, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5 }
        })
    }

    #[tokio::test]
    async fn test_complete_sends_expected_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .and(header_eq("authorization", "Bearer sk-test"))
            .and(header_eq("content-type", "application/json"))
            .and(body_json(json!({
                "model": "text-davinci-003",
                "prompt": "Say hi",
                "temperature": 0,
                "max_tokens": 300
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("\nHi")))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let request = CompletionRequest::new("Say hi").with_max_tokens(300);
        let response = assert_ok!(provider.complete(request).await);

        assert_eq!(response.id, "cmpl-1");
        assert_eq!(response.completion_text().unwrap(), "Hi");
    }

    #[tokio::test]
    async fn test_organization_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header_eq("openai-organization", "org-42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let config = OpenAIConfig::new("sk-test")
            .with_base_url(server.uri())
            .with_organization("org-42");
        let provider = OpenAI::with_config(config).unwrap();

        assert_ok!(provider.complete(CompletionRequest::new("x")).await);
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = provider_for(&server)
            .complete(CompletionRequest::new("x"))
            .await;

        match result {
            Err(Error::Provider {
                provider,
                status,
                message,
            }) => {
                assert_eq!(provider, "openai");
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let result = provider_for(&server)
            .complete(CompletionRequest::new("x"))
            .await;

        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = provider_for(&server)
            .complete(CompletionRequest::new("x"))
            .await;

        assert!(matches!(result, Err(Error::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_empty_choices_decode_but_have_no_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "cmpl-2", "choices": [] })),
            )
            .mount(&server)
            .await;

        let response = provider_for(&server)
            .complete(CompletionRequest::new("x"))
            .await
            .unwrap();

        assert!(matches!(
            response.completion_text(),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 1
        let config = OpenAIConfig::new("sk-test").with_base_url("http://127.0.0.1:1/v1");
        let provider = OpenAI::with_config(config).unwrap();

        let result = provider.complete(CompletionRequest::new("x")).await;
        assert!(matches!(result, Err(Error::Network { .. })));
    }

    #[test]
    fn test_with_api_key_uses_default_config() {
        let provider = OpenAI::with_api_key("sk-only-key").unwrap();

        let config = provider.config();
        assert_eq!(config.api_key, "sk-only-key");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.organization_id, None);
        assert_eq!(provider.default_model(), "text-davinci-003");
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/completions"
        );
    }

    #[tokio::test]
    async fn test_custom_http_client_status_is_mapped_by_provider() {
        struct Canned(HttpResponse);

        #[async_trait]
        impl HttpClient for Canned {
            async fn post(
                &self,
                _url: &str,
                _headers: HeaderMap,
                _body: serde_json::Value,
            ) -> Result<HttpResponse, Error> {
                Ok(self.0.clone())
            }
        }

        let canned = Canned(HttpResponse {
            status: 429,
            body: "slow down".to_string(),
        });
        let provider = OpenAI::new(OpenAIConfig::new("sk-test"), Arc::new(canned));

        match provider.complete(CompletionRequest::new("x")).await {
            Err(Error::Provider {
                provider, status, ..
            }) => {
                assert_eq!(provider, "openai");
                assert_eq!(status, 429);
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_model_comes_from_config() {
        let config = OpenAIConfig::new("sk-test").with_model("gpt-3.5-turbo-instruct");
        let provider = OpenAI::with_config(config).unwrap();
        assert_eq!(provider.default_model(), "gpt-3.5-turbo-instruct");
    }
}
