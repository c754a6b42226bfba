//! Core completion trait

use crate::error::Result;
use crate::types::request::{CompletionRequest, DEFAULT_MODEL};
use crate::types::response::CompletionResponse;
use async_trait::async_trait;

/// Anything that can turn a [`CompletionRequest`] into a [`CompletionResponse`]
///
/// Implementations perform exactly one round trip per call: no retries, no
/// caching. Transport failures come back as `Err`, never as panics.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Send one completion request and wait for the full response
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Model used when the caller does not pick one
    fn default_model(&self) -> &str {
        DEFAULT_MODEL
    }
}

#[async_trait]
impl<C: Completer + ?Sized> Completer for std::sync::Arc<C> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        (**self).complete(request).await
    }

    fn default_model(&self) -> &str {
        (**self).default_model()
    }
}
