//! OpenAI provider configuration

use crate::constants::{
    OPENAI_API_KEY_VAR, OPENAI_BASE_URL_VAR, OPENAI_DEFAULT_BASE_URL, OPENAI_MODEL_VAR,
    OPENAI_ORGANIZATION_VAR,
};
use kotoba_core::{Error, DEFAULT_MODEL};
use std::fmt;

/// Configuration for the OpenAI provider
#[derive(Clone)]
pub struct OpenAIConfig {
    /// API key for authentication
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Optional organization ID
    pub organization_id: Option<String>,
    /// Model used when a request does not name one
    pub model: String,
}

impl OpenAIConfig {
    /// Create a new configuration with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
            organization_id: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read the configuration from the process environment
    ///
    /// `OPENAI_API_KEY` is required. `OPENAI_BASE_URL`, `OPENAI_ORGANIZATION`
    /// and `OPENAI_COMPLETION_MODEL` are optional overrides.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(OPENAI_API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Configuration(format!("{} is not set", OPENAI_API_KEY_VAR)))?;

        let mut config = Self::new(api_key);
        if let Some(url) = lookup(OPENAI_BASE_URL_VAR) {
            config = config.with_base_url(url);
        }
        if let Some(org) = lookup(OPENAI_ORGANIZATION_VAR) {
            config = config.with_organization(org);
        }
        if let Some(model) = lookup(OPENAI_MODEL_VAR) {
            config = config.with_model(model);
        }
        Ok(config)
    }

    /// Set a custom base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the organization ID
    #[must_use]
    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization_id = Some(org.into());
        self
    }

    /// Set the default completion model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the URL for text completions
    pub fn completions_url(&self) -> String {
        format!("{}/completions", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("organization_id", &self.organization_id)
            .field("model", &self.model)
            .finish()
    }
}
