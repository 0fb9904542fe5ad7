//! Backdrop: Request-Scoped Context Store
//!
//! Associates an immutable, chainable key/value context with an opaque request
//! identity. Handlers and middleware read and extend the context concurrently without
//! holding any lock: every operation is a message to the worker that owns the
//! identity, and each entry can be cancelled and evicted once its request finishes.

pub mod config;
pub mod context;
pub mod error;
pub mod global;
pub mod logging;
pub mod store;
pub mod types;

pub use context::{CancelHandle, CancelScope, Context, ContextKey, ContextValue};
pub use error::BackdropError;
pub use store::{Backdrop, StoreOptions};
pub use types::{Identity, RequestId};
