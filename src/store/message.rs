//! Mailbox protocol between dispatcher and workers.
//!
//! Every message carries a single-use reply channel; the owning worker answers each one
//! exactly once. A dropped reply sender only happens when the worker itself is gone.

use crate::context::{Context, ContextKey, ContextValue};
use tokio::sync::oneshot;

pub(crate) enum Message<I> {
    FetchContext {
        id: I,
        respond_to: oneshot::Sender<Context>,
    },
    SetContext {
        id: I,
        context: Context,
        respond_to: oneshot::Sender<()>,
    },
    FetchValue {
        id: I,
        key: ContextKey,
        respond_to: oneshot::Sender<Option<ContextValue>>,
    },
    SetValue {
        id: I,
        key: ContextKey,
        value: ContextValue,
        respond_to: oneshot::Sender<Context>,
    },
    Evict {
        id: I,
        respond_to: oneshot::Sender<()>,
    },
}

impl<I> Message<I> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Message::FetchContext { .. } => "fetch_context",
            Message::SetContext { .. } => "set_context",
            Message::FetchValue { .. } => "fetch_value",
            Message::SetValue { .. } => "set_value",
            Message::Evict { .. } => "evict",
        }
    }
}
