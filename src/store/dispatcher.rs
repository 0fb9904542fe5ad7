//! Public call-style API over the worker mailboxes.

use super::message::Message;
use super::options::StoreOptions;
use super::supervisor::Supervisor;
use crate::context::{Context, ContextKey, ContextValue};
use crate::error::BackdropError;
use crate::types::{Identity, RequestId};
use std::any::Any;
use std::collections::hash_map::RandomState;
use std::future::Future;
use std::hash::BuildHasher;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// Handle to a running context store.
///
/// Every call is turned into a message for the worker owning the identity's shard and
/// resolves once that worker replies. Clones share the same workers.
pub struct Backdrop<I: Identity = RequestId> {
    inner: Arc<Inner<I>>,
}

struct Inner<I> {
    mailboxes: Vec<mpsc::Sender<Message<I>>>,
    router: RandomState,
    supervisor: Supervisor,
}

impl<I: Identity> Clone for Backdrop<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: Identity> Backdrop<I> {
    /// Spawn the workers and return a handle. Must be called inside a tokio runtime.
    pub fn start(options: StoreOptions) -> Self {
        let (supervisor, mailboxes) = Supervisor::spawn(options);
        Self {
            inner: Arc::new(Inner {
                mailboxes,
                router: RandomState::new(),
                supervisor,
            }),
        }
    }

    /// Cancel the root scope and wait until every worker has halted.
    ///
    /// Messages already enqueued are serviced first. Entries are cancelled along with
    /// the root. Calls made afterwards fail as unavailable.
    pub async fn stop(&self) {
        self.inner.supervisor.stop().await
    }

    pub fn is_running(&self) -> bool {
        self.inner.supervisor.is_running()
    }

    pub fn workers(&self) -> usize {
        self.inner.supervisor.workers()
    }

    /// Look up `key` in the identity's chain.
    ///
    /// `NotFound` covers both a missing entry and a missing key.
    pub async fn get(
        &self,
        id: &I,
        key: impl Into<ContextKey>,
    ) -> Result<ContextValue, BackdropError> {
        let key = key.into();
        let value = self
            .call(id, |id, respond_to| Message::FetchValue {
                id,
                key,
                respond_to,
            })
            .await?;
        value.ok_or(BackdropError::NotFound)
    }

    /// Typed [`Backdrop::get`] returning a clone of the stored value.
    pub async fn get_as<T: Any + Clone>(
        &self,
        id: &I,
        key: impl Into<ContextKey>,
    ) -> Result<T, BackdropError> {
        let key = key.into();
        let value = self.get(id, key.clone()).await?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or(BackdropError::TypeMismatch { key })
    }

    /// Bind `key` to `value` on top of the identity's chain, creating the entry if needed.
    pub async fn set<V: Any + Send + Sync>(
        &self,
        id: &I,
        key: impl Into<ContextKey>,
        value: V,
    ) -> Result<(), BackdropError> {
        self.with_value(id, key, value)
            .await
            .map(|_| ())
            .map_err(|_| BackdropError::SetFailed)
    }

    /// [`Backdrop::set`], returning the chain the entry now holds.
    pub async fn with_value<V: Any + Send + Sync>(
        &self,
        id: &I,
        key: impl Into<ContextKey>,
        value: V,
    ) -> Result<Context, BackdropError> {
        let key = key.into();
        let value = ContextValue::new(value);
        self.call(id, |id, respond_to| Message::SetValue {
            id,
            key,
            value,
            respond_to,
        })
        .await
    }

    /// Current chain for the identity, creating an empty cancellable one if needed.
    pub async fn get_context(&self, id: &I) -> Result<Context, BackdropError> {
        self.call(id, |id, respond_to| Message::FetchContext { id, respond_to })
            .await
    }

    /// Replace the identity's chain outright.
    ///
    /// Only an existing entry is replaced; for an unknown identity this changes nothing
    /// and still reports success.
    pub async fn set_context(&self, id: &I, context: Context) -> Result<(), BackdropError> {
        self.call(id, |id, respond_to| Message::SetContext {
            id,
            context,
            respond_to,
        })
        .await
    }

    /// Cancel the identity's chain and drop the entry. Unknown identities are a no-op.
    pub async fn evict(&self, id: &I) -> Result<(), BackdropError> {
        self.call(id, |id, respond_to| Message::Evict { id, respond_to })
            .await
    }

    /// Run `work` for the identity, then evict it.
    pub async fn scoped<F: Future>(&self, id: &I, work: F) -> F::Output {
        let output = work.await;
        if let Err(err) = self.evict(id).await {
            warn!(id = ?id, error = %err, "Failed to evict after scoped work");
        }
        output
    }

    async fn call<R>(
        &self,
        id: &I,
        message: impl FnOnce(I, oneshot::Sender<R>) -> Message<I>,
    ) -> Result<R, BackdropError> {
        let (respond_to, reply) = oneshot::channel();
        self.inner.mailboxes[self.shard_of(id)]
            .send(message(id.clone(), respond_to))
            .await
            .map_err(|_| BackdropError::Unavailable)?;
        reply.await.map_err(|_| BackdropError::Unavailable)
    }

    fn shard_of(&self, id: &I) -> usize {
        let shards = self.inner.mailboxes.len();
        if shards == 1 {
            return 0;
        }
        (self.inner.router.hash_one(id) % shards as u64) as usize
    }
}
