//! Start-up options for the store.

use crate::context::Context;
use serde::{Deserialize, Serialize};

/// Options for [`crate::store::Backdrop::start`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Number of workers, each owning one shard of the mapping
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Capacity of each worker's mailbox
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Chain every entry derives from (a fresh background chain when unset)
    #[serde(skip)]
    pub base: Option<Context>,
}

fn default_workers() -> usize {
    1
}

fn default_buffer_size() -> usize {
    1
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            buffer_size: default_buffer_size(),
            base: None,
        }
    }
}

impl StoreOptions {
    pub fn new(base: Option<Context>, workers: usize, buffer_size: usize) -> Self {
        Self {
            workers,
            buffer_size,
            base,
        }
    }

    pub fn with_base(mut self, base: Context) -> Self {
        self.base = Some(base);
        self
    }

    /// Coerce zero counts to one and fill in the base chain.
    pub fn sane_defaults(mut self) -> Self {
        if self.workers == 0 {
            self.workers = default_workers();
        }
        if self.buffer_size == 0 {
            self.buffer_size = default_buffer_size();
        }
        if self.base.is_none() {
            self.base = Some(Context::background());
        }
        self
    }
}
