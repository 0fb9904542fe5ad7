//! Integration tests for the dispatcher operations
//!
//! Tests cover:
//! - Get/Set round trips and last-write-wins
//! - Eviction
//! - GetContext/SetContext semantics, including the no-entry case
//! - Base chain inheritance
//! - Scoped eviction
//! - Type-identity keys

use backdrop::{Backdrop, BackdropError, Context, ContextKey, RequestId, StoreOptions};
use std::time::Duration;

fn start_store() -> Backdrop<RequestId> {
    Backdrop::start(StoreOptions::default())
}

#[tokio::test]
async fn test_get_unseen_identity_is_not_found() {
    let store = start_store();
    let result = store.get(&RequestId::next(), "user").await;
    assert!(matches!(result, Err(BackdropError::NotFound)));
    store.stop().await;
}

#[tokio::test]
async fn test_set_then_get() {
    let store = start_store();
    let id = RequestId::next();

    store.set(&id, "user", "alice".to_string()).await.unwrap();
    let value: String = store.get_as(&id, "user").await.unwrap();
    assert_eq!(value, "alice");

    // Present entry, absent key
    let missing = store.get(&id, "role").await;
    assert!(matches!(missing, Err(BackdropError::NotFound)));
    store.stop().await;
}

#[tokio::test]
async fn test_last_write_wins() {
    let store = start_store();
    let id = RequestId::next();

    store.set(&id, "user", "alice").await.unwrap();
    store.set(&id, "user", "bob").await.unwrap();

    let value = store.get(&id, "user").await.unwrap();
    assert_eq!(value.downcast_ref::<&str>(), Some(&"bob"));
    store.stop().await;
}

#[tokio::test]
async fn test_evict_clears_every_key() {
    let store = start_store();
    let id = RequestId::next();

    store.set(&id, "user", "alice").await.unwrap();
    store.set(&id, 7u64, 42u32).await.unwrap();
    store.evict(&id).await.unwrap();

    assert!(matches!(store.get(&id, "user").await, Err(BackdropError::NotFound)));
    assert!(matches!(store.get(&id, 7u64).await, Err(BackdropError::NotFound)));
    store.stop().await;
}

#[tokio::test]
async fn test_evict_unknown_identity_is_noop() {
    let store = start_store();
    assert!(store.evict(&RequestId::next()).await.is_ok());
    store.stop().await;
}

#[tokio::test]
async fn test_evict_cancels_previously_fetched_context() {
    let store = start_store();
    let id = RequestId::next();

    let context = store.get_context(&id).await.unwrap();
    assert!(!context.is_cancelled());

    store.evict(&id).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), context.done())
        .await
        .expect("evicted context should be cancelled");
    store.stop().await;
}

#[tokio::test]
async fn test_get_context_is_idempotent() {
    let store = start_store();
    let id = RequestId::next();

    let first = store.get_context(&id).await.unwrap();
    let second = store.get_context(&id).await.unwrap();
    assert!(first.same_chain(&second));
    assert!(first.cancel_handle().is_some());

    store.set(&id, "user", "alice").await.unwrap();
    let third = store.get_context(&id).await.unwrap();
    assert!(!first.same_chain(&third));
    assert_eq!(third.get::<&str>("user"), Some(&"alice"));
    store.stop().await;
}

#[tokio::test]
async fn test_set_context_without_entry_is_noop() {
    let store = start_store();
    let id = RequestId::next();

    store.set(&id, "user", "alice").await.unwrap();
    store.evict(&id).await.unwrap();

    let arbitrary = Context::background().with_value("user", "mallory");
    store.set_context(&id, arbitrary).await.unwrap();

    assert!(matches!(store.get(&id, "user").await, Err(BackdropError::NotFound)));
    store.stop().await;
}

#[tokio::test]
async fn test_set_context_replaces_existing_entry() {
    let store = start_store();
    let id = RequestId::next();

    let context = store.get_context(&id).await.unwrap();
    let extended = context.with_value("user", "carol");
    store.set_context(&id, extended.clone()).await.unwrap();

    let value = store.get(&id, "user").await.unwrap();
    assert_eq!(value.downcast_ref::<&str>(), Some(&"carol"));
    assert!(store.get_context(&id).await.unwrap().same_chain(&extended));

    // Still derived from the stored entry, so eviction cancels it.
    store.evict(&id).await.unwrap();
    assert!(extended.is_cancelled());
    store.stop().await;
}

#[tokio::test]
async fn test_entry_without_cancel_handle_survives_evict() {
    let store = start_store();
    let id = RequestId::next();

    store.get_context(&id).await.unwrap();
    let detached = Context::background().with_value("user", "dave");
    store.set_context(&id, detached).await.unwrap();
    store.evict(&id).await.unwrap();

    let value = store.get(&id, "user").await.unwrap();
    assert_eq!(value.downcast_ref::<&str>(), Some(&"dave"));
    store.stop().await;
}

#[tokio::test]
async fn test_entries_inherit_base_chain() {
    let base = Context::background().with_value("tenant", "acme");
    let store: Backdrop<RequestId> = Backdrop::start(StoreOptions::default().with_base(base));
    let id = RequestId::next();

    assert!(matches!(store.get(&id, "tenant").await, Err(BackdropError::NotFound)));
    store.get_context(&id).await.unwrap();
    let tenant = store.get(&id, "tenant").await.unwrap();
    assert_eq!(tenant.downcast_ref::<&str>(), Some(&"acme"));
    store.stop().await;
}

#[tokio::test]
async fn test_scoped_evicts_after_work() {
    let store = start_store();
    let id = RequestId::next();

    let seen = store
        .scoped(&id, async {
            store.set(&id, "test", "testing").await.unwrap();
            let context = store.get_context(&id).await.unwrap();
            store.set_context(&id, context).await.unwrap();
            store.get_as::<&str>(&id, "test").await.unwrap()
        })
        .await;

    assert_eq!(seen, "testing");
    assert!(store.get(&id, "test").await.is_err());
    store.stop().await;
}

#[tokio::test]
async fn test_end_to_end() {
    let store = start_store();
    let id_a = RequestId::next();

    store.set(&id_a, "user", "alice").await.unwrap();
    assert_eq!(store.get_as::<&str>(&id_a, "user").await.unwrap(), "alice");
    store.evict(&id_a).await.unwrap();
    assert!(matches!(store.get(&id_a, "user").await, Err(BackdropError::NotFound)));
    store.stop().await;
}

#[tokio::test]
async fn test_custom_identity_type() {
    let store: Backdrop<String> = Backdrop::start(StoreOptions::default());
    let id = "GET /users/1 #1".to_string();

    store.set(&id, "user", 1u64).await.unwrap();
    assert_eq!(store.get_as::<u64>(&id, "user").await.unwrap(), 1);
    store.stop().await;
}

#[tokio::test]
async fn test_typed_keys_do_not_collide_with_names() {
    struct CurrentUser;

    let store = start_store();
    let id = RequestId::next();

    store.set(&id, "CurrentUser", "by-name").await.unwrap();
    store
        .set(&id, ContextKey::of::<CurrentUser>(), "by-type")
        .await
        .unwrap();

    assert_eq!(
        store
            .get_as::<&str>(&id, ContextKey::of::<CurrentUser>())
            .await
            .unwrap(),
        "by-type"
    );
    assert_eq!(store.get_as::<&str>(&id, "CurrentUser").await.unwrap(), "by-name");
    store.stop().await;
}
