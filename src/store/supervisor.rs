//! Worker pool start-up and cooperative shutdown.
//!
//! Start-up derives a cancellable root from the base chain, spawns one worker per shard
//! and a watcher task. Cancelling the root (via [`Supervisor::stop`], by cancelling the
//! base chain, or by dropping the supervisor) makes the watcher send a halt to each
//! worker individually. Each worker acknowledges once it has drained its mailbox.

use super::message::Message;
use super::options::StoreOptions;
use super::shard::Shard;
use super::worker::Worker;
use crate::context::{CancelHandle, Context};
use crate::types::Identity;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info, warn};

pub(crate) struct Supervisor {
    root: Context,
    root_handle: CancelHandle,
    workers: usize,
    acks: Mutex<Acks>,
}

/// Halt acknowledgments still owed by the workers.
struct Acks {
    stopped: mpsc::Receiver<usize>,
    pending: usize,
}

impl Supervisor {
    /// Spawn the worker pool. Returns the supervisor and one mailbox per worker.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn spawn<I: Identity>(options: StoreOptions) -> (Self, Vec<mpsc::Sender<Message<I>>>) {
        let options = options.sane_defaults();
        let base = options.base.unwrap_or_default();
        let (root, root_handle) = base.with_cancel();

        let (stopped_tx, stopped_rx) = mpsc::channel(options.workers);
        let mut mailboxes = Vec::with_capacity(options.workers);
        let mut halts = Vec::with_capacity(options.workers);

        for worker_id in 0..options.workers {
            let (mailbox_tx, mailbox_rx) = mpsc::channel(options.buffer_size);
            let (halt_tx, halt_rx) = oneshot::channel();
            let worker = Worker::new(
                worker_id,
                Shard::new(root.clone()),
                mailbox_rx,
                halt_rx,
                stopped_tx.clone(),
            );
            tokio::spawn(worker.run());
            mailboxes.push(mailbox_tx);
            halts.push(halt_tx);
        }

        let watched = root.clone();
        tokio::spawn(async move {
            watched.done().await;
            debug!(workers = halts.len(), "Root scope cancelled, halting workers");
            for halt in halts {
                let _ = halt.send(());
            }
        });

        info!(
            workers = options.workers,
            buffer_size = options.buffer_size,
            "Started backdrop workers"
        );

        let supervisor = Self {
            root,
            root_handle,
            workers: options.workers,
            acks: Mutex::new(Acks {
                stopped: stopped_rx,
                pending: options.workers,
            }),
        };
        (supervisor, mailboxes)
    }

    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.root.is_cancelled()
    }

    /// Cancel the root and wait for every worker's acknowledgment.
    ///
    /// Every call returns only once all workers have halted. Concurrent callers queue
    /// on the ack lock; the count of outstanding acks lives behind it, so a caller that
    /// gives up midway leaves the rest for the next one.
    pub(crate) async fn stop(&self) {
        self.root_handle.cancel();
        let mut acks = self.acks.lock().await;
        if acks.pending == 0 {
            return;
        }

        while acks.pending > 0 {
            match acks.stopped.recv().await {
                Some(worker_id) => {
                    debug!(worker_id, "Worker acknowledged halt");
                    acks.pending -= 1;
                }
                None => {
                    warn!(missing = acks.pending, "Ack channel closed before all workers halted");
                    acks.pending = 0;
                }
            }
        }
        info!(workers = self.workers, "Stopped backdrop workers");
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.root_handle.cancel();
    }
}
