//! Pending-request registry
//!
//! Maps each in-flight [`RequestId`] to the callbacks that will receive its
//! outcome. Entries are inserted before the request leaves the process and
//! taken out exactly once, on success or failure.

use kotoba_core::{Error, RequestId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Callback receiving the completion text
pub type TextCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Callback receiving the failure of a request
pub type ErrorCallback = Box<dyn FnOnce(RequestId, Error) + Send + 'static>;

/// Callbacks waiting on one request
pub struct Pending {
    on_text: TextCallback,
    on_error: ErrorCallback,
}

impl Pending {
    /// Bundle a success and a failure callback
    pub fn new<F, E>(on_text: F, on_error: E) -> Self
    where
        F: FnOnce(String) + Send + 'static,
        E: FnOnce(RequestId, Error) + Send + 'static,
    {
        Self {
            on_text: Box::new(on_text),
            on_error: Box::new(on_error),
        }
    }

    /// Hand the completion text to the success callback
    pub fn deliver(self, text: String) {
        (self.on_text)(text);
    }

    /// Hand the failure to the error callback
    pub fn fail(self, id: RequestId, error: Error) {
        (self.on_error)(id, error);
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Inner {
    next_id: RequestId,
    entries: HashMap<RequestId, Pending>,
}

/// Shared map from request id to pending callbacks
///
/// Cloning yields another handle to the same registry. Ids start at zero and
/// grow by one per insert; after wrapping around, ids still in use are
/// skipped so two live requests never share an id.
#[derive(Clone, Default)]
pub struct PendingRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl PendingRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    // Callbacks never run while the lock is held, so a poisoned lock still
    // guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `pending` under a fresh id and return that id
    pub fn insert(&self, pending: Pending) -> RequestId {
        let mut inner = self.lock();

        let mut id = inner.next_id;
        while inner.entries.contains_key(&id) {
            id = id.next();
        }
        inner.next_id = id.next();
        inner.entries.insert(id, pending);

        trace!(%id, pending = inner.entries.len(), "registered request");
        id
    }

    /// Remove and return the entry for `id`
    pub fn take(&self, id: RequestId) -> Option<Pending> {
        let mut inner = self.lock();
        let pending = inner.entries.remove(&id);
        trace!(%id, found = pending.is_some(), pending = inner.entries.len(), "released request");
        pending
    }

    /// Whether `id` is still waiting for an outcome
    pub fn contains(&self, id: RequestId) -> bool {
        self.lock().entries.contains_key(&id)
    }

    /// Number of requests waiting for an outcome
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no request is waiting
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    #[cfg(test)]
    fn with_next_id(next_id: RequestId) -> Self {
        let registry = Self::new();
        registry.lock().next_id = next_id;
        registry
    }
}

impl fmt::Debug for PendingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("PendingRegistry")
            .field("next_id", &inner.next_id)
            .field("pending", &inner.entries.len())
            .finish()
    }
}
