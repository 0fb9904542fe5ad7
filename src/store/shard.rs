//! The identity → chain mapping owned by one worker.

use super::message::Message;
use crate::context::{Context, ContextKey, ContextValue};
use crate::types::Identity;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Result of servicing an evict request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EvictOutcome {
    Evicted,
    Absent,
    /// Entry kept: nothing on its chain can cancel it.
    NoCancelHandle,
}

pub(crate) struct Shard<I> {
    base: Context,
    contexts: HashMap<I, Context>,
}

impl<I: Identity> Shard<I> {
    pub(crate) fn new(base: Context) -> Self {
        Self {
            base,
            contexts: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Service one message and reply to it.
    pub(crate) async fn handle(&mut self, message: Message<I>) {
        trace!(kind = message.kind(), "Handling message");
        match message {
            Message::FetchContext { id, respond_to } => {
                let _ = respond_to.send(self.fetch_context(id));
            }
            Message::SetContext {
                id,
                context,
                respond_to,
            } => {
                if !self.set_context(&id, context) {
                    debug!(id = ?id, "set_context ignored, no entry");
                }
                let _ = respond_to.send(());
            }
            Message::FetchValue {
                id,
                key,
                respond_to,
            } => {
                let _ = respond_to.send(self.fetch_value(&id, &key));
            }
            Message::SetValue {
                id,
                key,
                value,
                respond_to,
            } => {
                let _ = respond_to.send(self.set_value(id, key, value));
            }
            Message::Evict { id, respond_to } => {
                let outcome = self.evict(&id).await;
                debug!(id = ?id, ?outcome, "Evict serviced");
                let _ = respond_to.send(());
            }
        }
    }

    fn fresh_entry(base: &Context) -> Context {
        let (context, _) = base.with_cancel();
        context
    }

    pub(crate) fn fetch_context(&mut self, id: I) -> Context {
        let base = &self.base;
        self.contexts
            .entry(id)
            .or_insert_with(|| Self::fresh_entry(base))
            .clone()
    }

    pub(crate) fn fetch_value(&self, id: &I, key: &ContextKey) -> Option<ContextValue> {
        self.contexts
            .get(id)
            .and_then(|context| context.value(key).cloned())
    }

    /// Replace an existing entry verbatim. Returns `false` (and changes nothing) when
    /// the identity has no entry yet.
    pub(crate) fn set_context(&mut self, id: &I, context: Context) -> bool {
        match self.contexts.get_mut(id) {
            Some(entry) => {
                *entry = context;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_value(&mut self, id: I, key: ContextKey, value: ContextValue) -> Context {
        let base = &self.base;
        let entry = self
            .contexts
            .entry(id)
            .or_insert_with(|| Self::fresh_entry(base));
        *entry = entry.with_context_value(key, value);
        entry.clone()
    }

    pub(crate) async fn evict(&mut self, id: &I) -> EvictOutcome {
        let Some(context) = self.contexts.get(id).cloned() else {
            return EvictOutcome::Absent;
        };
        let Some(handle) = context.cancel_handle().cloned() else {
            warn!(id = ?id, "Entry has no cancel handle, leaving it in place");
            return EvictOutcome::NoCancelHandle;
        };

        handle.cancel();
        context.done().await;
        self.contexts.remove(id);
        EvictOutcome::Evicted
    }
}
