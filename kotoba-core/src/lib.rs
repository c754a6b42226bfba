//! Core traits and types for the Kotoba completion dispatcher
//!
//! This crate holds the error type, the completions wire format and the
//! [`Completer`] trait that providers implement.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod provider;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use provider::Completer;
pub use types::{
    request::{CompletionRequest, RequestId, DEFAULT_MAX_TOKENS, DEFAULT_MODEL},
    response::{strip_leading_newlines, Choice, CompletionResponse, Usage},
};
