//! Provider implementations for text-completion services

#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod http;

// Provider implementations
pub mod openai;

// Re-export provider types
pub use openai::{OpenAI, OpenAIConfig};
