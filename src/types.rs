//! Shared identity types.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounds a request identity must meet to key the store.
pub trait Identity: Eq + Hash + Clone + Send + Sync + fmt::Debug + 'static {}

impl<T> Identity for T where T: Eq + Hash + Clone + Send + Sync + fmt::Debug + 'static {}

/// Opaque token identifying one in-flight request.
///
/// The store only ever hashes and compares identities; any `Eq + Hash` type can be used
/// in place of this one, `RequestId` is simply the ready-made option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Mint the next process-unique request ID
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        RequestId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        RequestId(value)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}
