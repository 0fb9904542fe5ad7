//! Broadcast-once cancellation signals.
//!
//! A [`CancelScope`] fires at most once. Scopes form a tree of
//! [`CancellationToken`]s: a child observes its own signal and every ancestor's, and
//! cancelling a scope reaches everything derived from it. Cancelling a child never
//! touches its parent.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Observable cancellation signal.
#[derive(Clone)]
pub struct CancelScope {
    token: CancellationToken,
    depth: usize,
}

impl CancelScope {
    /// A scope with no parent. Nothing cancels it unless a handle is derived for it.
    pub fn root() -> Self {
        Self {
            token: CancellationToken::new(),
            depth: 1,
        }
    }

    /// Derive a child scope together with the handle that cancels it.
    pub fn child(&self) -> (CancelScope, CancelHandle) {
        let scope = Self {
            token: self.token.child_token(),
            depth: self.depth + 1,
        };
        let handle = CancelHandle {
            scope: scope.clone(),
            fired: Arc::new(AtomicBool::new(false)),
        };
        (scope, handle)
    }

    /// True once this scope or any ancestor has fired.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once this scope or any ancestor fires.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Number of scopes from this one up to its root, inclusive.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for CancelScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelScope")
            .field("depth", &self.depth)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Trigger for one [`CancelScope`].
#[derive(Clone)]
pub struct CancelHandle {
    scope: CancelScope,
    fired: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Fire the scope. Returns `false` if this handle (or a clone) already fired it.
    pub fn cancel(&self) -> bool {
        let first = !self.fired.swap(true, Ordering::AcqRel);
        self.scope.token.cancel();
        first
    }

    pub fn scope(&self) -> &CancelScope {
        &self.scope
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CancelHandle").field(&self.scope).finish()
    }
}
