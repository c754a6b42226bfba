//! Callback-based dispatch of completion requests
//!
//! A [`Dispatcher`] accepts `(prompt, callback)` pairs, sends one request per
//! pair in the background and hands each completion to the callback that was
//! registered with it. The [`PendingRegistry`] keeps the id-to-callback map.

#![warn(missing_docs)]

mod dispatcher;
pub mod registry;

pub use dispatcher::{Dispatcher, DISPATCH_MAX_TOKENS};
pub use registry::{Pending, PendingRegistry};

/// Prelude module for convenient imports
pub mod prelude {
    pub use super::Dispatcher;
    pub use kotoba_core::{Error, RequestId, Result};
}
