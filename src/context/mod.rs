//! Context chain: immutable key/value nodes with cooperative cancellation.

pub mod cancel;
pub mod chain;
pub mod value;

pub use cancel::{CancelHandle, CancelScope};
pub use chain::Context;
pub use value::{ContextKey, ContextValue};
