//! Immutable, parent-linked context chain.

use super::cancel::{CancelHandle, CancelScope};
use super::value::{ContextKey, ContextValue};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One node of a context chain.
///
/// Deriving never mutates the receiver: [`Context::with_value`] and
/// [`Context::with_cancel`] return a new node that points at `self`, so earlier
/// chains stay valid and share their ancestors with later ones.
#[derive(Clone)]
pub struct Context {
    node: Arc<Node>,
}

struct Node {
    parent: Option<Context>,
    pair: Option<(ContextKey, ContextValue)>,
    scope: CancelScope,
    cancel: Option<CancelHandle>,
}

impl Context {
    /// A fresh root chain: no values, never cancelled.
    pub fn background() -> Self {
        Self {
            node: Arc::new(Node {
                parent: None,
                pair: None,
                scope: CancelScope::root(),
                cancel: None,
            }),
        }
    }

    /// Derive a chain where `key` resolves to `value`, shadowing any earlier binding.
    pub fn with_value<V: Any + Send + Sync>(&self, key: impl Into<ContextKey>, value: V) -> Self {
        self.with_context_value(key.into(), ContextValue::new(value))
    }

    pub fn with_context_value(&self, key: ContextKey, value: ContextValue) -> Self {
        Self {
            node: Arc::new(Node {
                parent: Some(self.clone()),
                pair: Some((key, value)),
                scope: self.node.scope.clone(),
                cancel: None,
            }),
        }
    }

    /// Derive a cancellable chain. The handle cancels the new chain and everything
    /// later derived from it, never `self`.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (scope, handle) = self.node.scope.child();
        let context = Self {
            node: Arc::new(Node {
                parent: Some(self.clone()),
                pair: None,
                scope,
                cancel: Some(handle.clone()),
            }),
        };
        (context, handle)
    }

    /// Resolve `key`, most recent binding first.
    pub fn value(&self, key: &ContextKey) -> Option<&ContextValue> {
        self.ancestors().find_map(|node| match &node.pair {
            Some((k, v)) if k == key => Some(v),
            _ => None,
        })
    }

    /// Typed convenience over [`Context::value`].
    pub fn get<T: Any>(&self, key: impl Into<ContextKey>) -> Option<&T> {
        self.value(&key.into())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// The nearest cancellation handle on the chain, if any node carries one.
    pub fn cancel_handle(&self) -> Option<&CancelHandle> {
        self.ancestors().find_map(|node| node.cancel.as_ref())
    }

    pub fn scope(&self) -> &CancelScope {
        &self.node.scope
    }

    pub fn is_cancelled(&self) -> bool {
        self.node.scope.is_cancelled()
    }

    /// Wait until this chain is cancelled.
    pub async fn done(&self) {
        self.node.scope.cancelled().await
    }

    /// True when both handles point at the very same node.
    pub fn same_chain(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Number of nodes from this one up to the root, inclusive.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    fn ancestors(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(Some(&*self.node), |node| {
            node.parent.as_ref().map(|parent| &*parent.node)
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// Unlink iteratively; a chain grown by many sets would otherwise recurse once per node.
impl Drop for Node {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(context) = next {
            match Arc::try_unwrap(context.node) {
                Ok(mut node) => next = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}
