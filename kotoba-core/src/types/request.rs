//! Request types for the completions endpoint

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Default completion model
pub const DEFAULT_MODEL: &str = "text-davinci-003";

/// Default `max_tokens` for a bare [`CompletionRequest`]
pub const DEFAULT_MAX_TOKENS: u32 = 100;

/// Identifier of a request submitted to a dispatcher
///
/// Ids are handed out in increasing order starting at zero and are never
/// shared by two requests that are pending at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id value
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The id that follows this one, wrapping at `u64::MAX`
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Body of a `POST /completions` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model to complete with
    pub model: String,
    /// Prompt text, sent verbatim
    pub prompt: String,
    /// Sampling temperature
    #[serde(serialize_with = "serialize_temperature")]
    pub temperature: f64,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request for `prompt` with default settings
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            prompt: prompt.into(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the token limit
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

// Whole temperatures go out as integers (`"temperature":0`), the form the
// endpoint documents; fractional ones stay floats.
#[allow(
    clippy::cast_possible_truncation,
    clippy::float_cmp,
    clippy::trivially_copy_pass_by_ref
)]
fn serialize_temperature<S: Serializer>(temperature: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

    if temperature.fract() == 0.0 && temperature.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*temperature as i64)
    } else {
        serializer.serialize_f64(*temperature)
    }
}
