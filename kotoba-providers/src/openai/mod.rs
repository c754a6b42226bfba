//! OpenAI completions provider

mod config;
mod provider;

pub use config::OpenAIConfig;
pub use provider::OpenAI;
