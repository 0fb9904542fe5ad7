//! Integration tests for concurrent access
//!
//! Tests cover:
//! - No lost writes with a single worker
//! - No lost writes per identity with several workers
//! - Independent identities across shards

use backdrop::{Backdrop, RequestId, StoreOptions};
use std::collections::HashSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sets_single_worker() {
    let store: Backdrop<RequestId> = Backdrop::start(StoreOptions::default());
    let id = RequestId::next();

    let mut tasks = Vec::new();
    for i in 0..200u64 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move { store.set(&id, i, "x").await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    for i in 0..200u64 {
        let value = store.get(&id, i).await.unwrap();
        assert_eq!(value.downcast_ref::<&str>(), Some(&"x"));
    }
    store.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sets_same_identity_many_workers() {
    let store: Backdrop<RequestId> = Backdrop::start(StoreOptions::new(None, 4, 4));
    let id = RequestId::next();

    let mut tasks = Vec::new();
    for i in 0..200u64 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move { store.set(&id, i, i).await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let context = store.get_context(&id).await.unwrap();
    for i in 0..200u64 {
        assert_eq!(context.get::<u64>(i), Some(&i));
    }
    store.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_identities_across_shards() {
    let store: Backdrop<RequestId> = Backdrop::start(StoreOptions::new(None, 4, 16));
    let ids: Vec<RequestId> = (0..50).map(|_| RequestId::next()).collect();

    let mut tasks = Vec::new();
    for id in ids.iter().copied() {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            for key in 0..10u64 {
                store.set(&id, key, id.as_u64()).await.unwrap();
            }
            store.evict(&id).await.unwrap();
            store.set(&id, "after", id.as_u64()).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let mut seen = HashSet::new();
    for id in &ids {
        assert!(store.get(id, 0u64).await.is_err());
        let after: u64 = store.get_as(id, "after").await.unwrap();
        assert_eq!(after, id.as_u64());
        seen.insert(after);
    }
    assert_eq!(seen.len(), ids.len());
    store.stop().await;
}
