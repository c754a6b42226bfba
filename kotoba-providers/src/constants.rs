//! Constants for provider implementations

/// Provider name reported in OpenAI errors
pub const OPENAI_PROVIDER_NAME: &str = "openai";

/// Default OpenAI base URL
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the OpenAI base URL
pub const OPENAI_BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Environment variable holding the OpenAI organization id
pub const OPENAI_ORGANIZATION_VAR: &str = "OPENAI_ORGANIZATION";

/// Environment variable overriding the completion model
pub const OPENAI_MODEL_VAR: &str = "OPENAI_COMPLETION_MODEL";
