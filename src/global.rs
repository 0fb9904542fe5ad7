//! Process-wide store.
//!
//! The first [`start`] creates the store; every later call is a no-op, even after
//! [`stop`]. The workers live on the runtime that made the first call, so call it from a
//! runtime that outlives every user of these functions.

use crate::context::{Context, ContextKey, ContextValue};
use crate::error::BackdropError;
use crate::store::{Backdrop, StoreOptions};
use crate::types::RequestId;
use std::any::Any;
use std::sync::OnceLock;
use tracing::{debug, warn};

static STORE: OnceLock<Backdrop<RequestId>> = OnceLock::new();

/// Start the process-wide store once.
pub fn start(options: StoreOptions) {
    let mut started = false;
    STORE.get_or_init(|| {
        started = true;
        Backdrop::start(options)
    });
    if !started {
        debug!("Backdrop already started, ignoring start");
    }
}

/// Stop the process-wide store, waiting for all workers to halt.
pub async fn stop() {
    match STORE.get() {
        Some(store) => store.stop().await,
        None => warn!("Backdrop stop called before start"),
    }
}

/// The started store, if any.
pub fn handle() -> Option<Backdrop<RequestId>> {
    STORE.get().cloned()
}

fn store() -> Result<&'static Backdrop<RequestId>, BackdropError> {
    STORE.get().ok_or(BackdropError::Unavailable)
}

pub async fn get(id: &RequestId, key: impl Into<ContextKey>) -> Result<ContextValue, BackdropError> {
    store()?.get(id, key).await
}

pub async fn set<V: Any + Send + Sync>(
    id: &RequestId,
    key: impl Into<ContextKey>,
    value: V,
) -> Result<(), BackdropError> {
    store()
        .map_err(|_| BackdropError::SetFailed)?
        .set(id, key, value)
        .await
}

pub async fn get_context(id: &RequestId) -> Result<Context, BackdropError> {
    store()?.get_context(id).await
}

pub async fn set_context(id: &RequestId, context: Context) -> Result<(), BackdropError> {
    store()?.set_context(id, context).await
}

pub async fn evict(id: &RequestId) -> Result<(), BackdropError> {
    store()?.evict(id).await
}
