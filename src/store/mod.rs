//! Request Context Store
//!
//! Maps request identities to context chains without callers taking any lock. The
//! mapping is split into shards, one per worker task; a worker is the only code that
//! ever touches its shard, and callers reach it through the worker's mailbox. All
//! operations on one identity are serialized by the worker that owns it.

mod dispatcher;
mod message;
mod options;
mod shard;
mod supervisor;
mod worker;

pub use dispatcher::Backdrop;
pub use options::StoreOptions;
