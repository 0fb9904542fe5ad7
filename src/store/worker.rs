//! Worker loop: sole owner of one shard.

use super::message::Message;
use super::shard::Shard;
use crate::types::Identity;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

pub(crate) struct Worker<I> {
    worker_id: usize,
    shard: Shard<I>,
    mailbox: mpsc::Receiver<Message<I>>,
    halt: oneshot::Receiver<()>,
    stopped: mpsc::Sender<usize>,
}

impl<I: Identity> Worker<I> {
    pub(crate) fn new(
        worker_id: usize,
        shard: Shard<I>,
        mailbox: mpsc::Receiver<Message<I>>,
        halt: oneshot::Receiver<()>,
        stopped: mpsc::Sender<usize>,
    ) -> Self {
        Self {
            worker_id,
            shard,
            mailbox,
            halt,
            stopped,
        }
    }

    /// Run until halted or until every dispatcher handle is gone, then drain and
    /// acknowledge.
    pub(crate) async fn run(mut self) {
        let worker_id = self.worker_id;
        debug!(worker_id, "Worker started");

        loop {
            tokio::select! {
                _ = &mut self.halt => {
                    debug!(worker_id, "Halt received");
                    break;
                }
                message = self.mailbox.recv() => match message {
                    Some(message) => self.shard.handle(message).await,
                    None => {
                        debug!(worker_id, "Mailbox closed");
                        break;
                    }
                },
            }
        }

        // Anything enqueued before the close still gets its reply.
        self.mailbox.close();
        let mut drained = 0usize;
        while let Some(message) = self.mailbox.recv().await {
            self.shard.handle(message).await;
            drained += 1;
        }

        info!(
            worker_id,
            drained,
            entries = self.shard.len(),
            "Worker stopped"
        );
        let _ = self.stopped.send(worker_id).await;
    }
}
