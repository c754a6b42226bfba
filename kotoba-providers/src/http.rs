//! HTTP client abstraction and utilities

use crate::error;
use kotoba_core::Error;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction
///
/// Only failures to complete the exchange are errors here. Interpreting the
/// status is left to the provider, which knows its own name and error shape.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a JSON POST request and read the whole response body
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<HttpResponse, Error>;
}

/// Default HTTP client implementation using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new HTTP client without a request timeout
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(error::network_error)?;

        Ok(Self::from_client(client))
    }

    /// Create a new HTTP client that gives up on a request after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(error::network_error)?;

        Ok(Self::from_client(client))
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn post(&self, url: &str, headers: HeaderMap, body: Value) -> Result<HttpResponse, Error> {
        debug!(url, "sending completion request");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(error::network_error)?;

        let status = response.status().as_u16();
        debug!(url, status, "received response");

        let body = response.text().await.map_err(error::network_error)?;
        Ok(HttpResponse { status, body })
    }
}

/// Helper to create common headers
pub fn create_headers(api_key: &str, additional: Option<HeaderMap>) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();

    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| Error::Configuration(format!("Invalid API key: {}", e)))?,
    );

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(additional) = additional {
        headers.extend(additional);
    }

    Ok(headers)
}

/// Build a single-entry header map, validating both name and value
///
/// Names are case-insensitive and stored lowercase.
pub fn header(name: &str, value: &str) -> Result<HeaderMap, Error> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::Configuration(format!("Invalid header name {:?}: {}", name, e)))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| Error::Configuration(format!("Invalid value for {}: {}", name, e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(header_name, value);
    Ok(headers)
}
