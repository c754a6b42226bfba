//! Response types for the completions endpoint

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// One generated alternative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Generated text
    pub text: String,
    /// Position of this choice in the response
    #[serde(default)]
    pub index: u32,
    /// Log probabilities, when requested
    #[serde(default)]
    pub logprobs: Option<Value>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Body returned by `POST /completions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Response id assigned by the provider
    #[serde(default)]
    pub id: String,
    /// Object type, `text_completion` for this endpoint
    #[serde(default)]
    pub object: String,
    /// Model that produced the completion
    #[serde(default)]
    pub model: String,
    /// Unix timestamp of creation
    #[serde(default)]
    pub created: i64,
    /// Generated alternatives, in order
    pub choices: Vec<Choice>,
    /// Usage statistics
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl CompletionResponse {
    /// Text of the first choice
    ///
    /// Fails with [`Error::MalformedResponse`] when there are no choices.
    pub fn first_text(&self) -> Result<&str> {
        self.choices
            .first()
            .map(|choice| choice.text.as_str())
            .ok_or_else(|| Error::malformed("no choices in response"))
    }

    /// Text of the first choice with leading newlines removed
    pub fn completion_text(&self) -> Result<String> {
        self.first_text().map(|text| strip_leading_newlines(text).to_string())
    }
}

/// Drop leading `\n` characters, leaving everything else untouched
pub fn strip_leading_newlines(text: &str) -> &str {
    text.trim_start_matches('\n')
}
