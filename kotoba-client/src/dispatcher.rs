//! Callback-based request dispatcher

use crate::registry::{Pending, PendingRegistry};
use kotoba_core::{Completer, CompletionRequest, Error, RequestId, Result};
use kotoba_providers::OpenAI;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

/// `max_tokens` sent with every dispatched request unless overridden
pub const DISPATCH_MAX_TOKENS: u32 = 300;

type ErrorHandler = Arc<dyn Fn(RequestId, Error) + Send + Sync + 'static>;

/// Sends prompts to a [`Completer`] and routes each answer to its own callback
///
/// Every `submit` registers the callback under a fresh [`RequestId`] and
/// spawns one task on the tokio runtime. When the task finishes, or is torn
/// down early by a panicking provider or a runtime shutdown, the entry is
/// removed from the registry and exactly one of the request's callbacks runs:
/// the text callback on success, the error callback on any failure.
///
/// Clones share the provider and the registry.
///
/// # Examples
///
/// ```no_run
/// use kotoba_client::Dispatcher;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), kotoba_core::Error> {
/// let dispatcher = Dispatcher::from_env()?;
///
/// dispatcher.submit("Write a haiku about rust", |text| {
///     println!("{}", text);
/// });
/// # Ok(())
/// # }
/// ```
pub struct Dispatcher<P> {
    provider: Arc<P>,
    registry: PendingRegistry,
    runtime: Handle,
    model: Option<String>,
    max_tokens: u32,
    on_error: ErrorHandler,
}

impl Dispatcher<OpenAI> {
    /// Create a dispatcher for OpenAI configured from the environment
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAI::from_env()?)
    }
}

impl<P: Completer + 'static> Dispatcher<P> {
    /// Create a dispatcher that spawns onto the current tokio runtime
    pub fn new(provider: P) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::Configuration(format!("no tokio runtime available: {}", e)))?;
        Ok(Self::with_runtime(provider, runtime))
    }

    /// Create a dispatcher that spawns onto `runtime`
    pub fn with_runtime(provider: P, runtime: Handle) -> Self {
        Self {
            provider: Arc::new(provider),
            registry: PendingRegistry::new(),
            runtime,
            model: None,
            max_tokens: DISPATCH_MAX_TOKENS,
            on_error: Arc::new(log_failure),
        }
    }

    /// Use `model` instead of the provider's default
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the token limit sent with each request
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Replace the handler that receives failures of requests sent with
    /// [`submit`](Self::submit)
    ///
    /// The default handler logs the failure at `warn` level.
    #[must_use]
    pub fn with_error_handler<E>(mut self, handler: E) -> Self
    where
        E: Fn(RequestId, Error) + Send + Sync + 'static,
    {
        self.on_error = Arc::new(handler);
        self
    }

    /// Send `prompt` and pass the completion text to `on_text`
    ///
    /// Returns as soon as the request is registered; the network call runs
    /// in the background. Failures go to the dispatcher's error handler and
    /// `on_text` is then never called.
    pub fn submit<F>(&self, prompt: impl Into<String>, on_text: F) -> RequestId
    where
        F: FnOnce(String) + Send + 'static,
    {
        let on_error = Arc::clone(&self.on_error);
        self.submit_with(prompt, on_text, move |id, error| on_error(id, error))
    }

    /// Like [`submit`](Self::submit), with a failure callback for this request only
    pub fn submit_with<F, E>(&self, prompt: impl Into<String>, on_text: F, on_error: E) -> RequestId
    where
        F: FnOnce(String) + Send + 'static,
        E: FnOnce(RequestId, Error) + Send + 'static,
    {
        let request = self.build_request(prompt.into());
        let id = self.registry.insert(Pending::new(on_text, on_error));
        debug!(%id, prompt_len = request.prompt.len(), "submitted completion request");

        let provider = Arc::clone(&self.provider);
        let in_flight = InFlight::new(self.registry.clone(), id);
        self.runtime.spawn(run_request(provider, in_flight, request));
        id
    }

    /// Send `prompt` and wait for the completion text
    ///
    /// Runs the same request as [`submit`](Self::submit) without going
    /// through the registry.
    pub async fn complete(&self, prompt: impl Into<String>) -> Result<String> {
        let request = self.build_request(prompt.into());
        fetch_text(self.provider.as_ref(), request).await
    }

    /// Number of submitted requests still waiting for an outcome
    pub fn pending(&self) -> usize {
        self.registry.len()
    }

    /// Whether `id` is still waiting for an outcome
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.registry.contains(id)
    }

    /// The provider requests are sent to
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn build_request(&self, prompt: String) -> CompletionRequest {
        let model = self
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());

        CompletionRequest::new(prompt)
            .with_model(model)
            .with_max_tokens(self.max_tokens)
    }
}

impl<P> Clone for Dispatcher<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            registry: self.registry.clone(),
            runtime: self.runtime.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            on_error: Arc::clone(&self.on_error),
        }
    }
}

impl<P> fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

fn log_failure(id: RequestId, error: Error) {
    warn!(%id, %error, "completion request failed");
}

async fn fetch_text<P: Completer + ?Sized>(provider: &P, request: CompletionRequest) -> Result<String> {
    provider.complete(request).await?.completion_text()
}

/// Claim on a registry entry held by the task serving that request
///
/// Whatever happens to the task, the entry is released exactly once: by
/// [`settle`](Self::settle) when an outcome arrives, or by `Drop` when the
/// task is torn down first (provider panic, runtime shutdown).
struct InFlight {
    registry: PendingRegistry,
    id: RequestId,
    settled: bool,
}

impl InFlight {
    fn new(registry: PendingRegistry, id: RequestId) -> Self {
        Self {
            registry,
            id,
            settled: false,
        }
    }

    fn settle(mut self, outcome: Result<String>) {
        self.settled = true;
        let id = self.id;

        let Some(pending) = self.registry.take(id) else {
            error!(%id, error = %Error::UnknownRequest(id), "completion finished for an unregistered request");
            return;
        };

        match outcome {
            Ok(text) => {
                debug!(%id, text_len = text.len(), "delivering completion");
                pending.deliver(text);
            }
            Err(error) => pending.fail(id, error),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Some(pending) = self.registry.take(self.id) {
            warn!(id = %self.id, "request task ended without an outcome");
            pending.fail(
                self.id,
                Error::Interrupted("task ended before the completion arrived".to_string()),
            );
        }
    }
}

// The guard is an argument so it is owned by the future even before the
// first poll; dropping an unpolled task still releases the entry.
async fn run_request<P: Completer>(
    provider: Arc<P>,
    in_flight: InFlight,
    request: CompletionRequest,
) {
    let outcome = fetch_text(provider.as_ref(), request).await;
    in_flight.settle(outcome);
}
