//! Kotoba - callback-based dispatch of text-completion requests
//!
//! Submit a prompt together with a callback; the request runs in the
//! background and the callback receives the completion text once it
//! arrives. Concurrent requests are tracked by id, so every answer reaches
//! the callback it was submitted with.
//!
//! # Quick Start
//!
//! ```no_run
//! use kotoba::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Reads OPENAI_API_KEY from the environment
//! let dispatcher = Dispatcher::from_env()?;
//!
//! dispatcher.submit("Name three rivers in Japan", |text| {
//!     println!("{}", text);
//! });
//!
//! // Or await the text directly
//! let text = dispatcher.complete("And three mountains").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Re-export core types
pub use kotoba_core::*;

pub mod providers {
    //! Provider implementations
    pub use kotoba_providers::*;
}

pub mod client {
    //! Dispatcher and pending-request registry
    pub use kotoba_client::*;
}

pub use kotoba_client::Dispatcher;

/// Prelude module for convenient imports
pub mod prelude {
    pub use kotoba_client::Dispatcher;
    pub use kotoba_core::{Completer, CompletionRequest, CompletionResponse, Error, RequestId, Result};
    pub use kotoba_providers::{OpenAI, OpenAIConfig};
}
