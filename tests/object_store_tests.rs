//! Object store adapter tests
//!
//! Batch-deletion chunking and folder deletion semantics, exercised
//! against the in-memory backend.

use bytes::Bytes;

use shorthost::errors::ShorthostError;
use shorthost::object_store::{DELETE_BATCH_LIMIT, MemoryObjectStore, ObjectStore};

async fn fill(store: &MemoryObjectStore, prefix: &str, count: usize) {
    for i in 0..count {
        store
            .put(
                &format!("{}obj-{:05}", prefix, i),
                Bytes::from_static(b"x"),
                "text/plain",
            )
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn delete_folder_chunks_at_batch_limit() {
    let store = MemoryObjectStore::new();
    fill(&store, "bulk/", 2500).await;
    // 其他前缀的对象不能被波及
    store
        .put("other/keep.txt", Bytes::from_static(b"x"), "text/plain")
        .await
        .unwrap();

    let deleted = store.delete_folder("bulk/").await.unwrap();

    assert_eq!(deleted, 2500);
    // 1000 + 1000 + 500
    assert_eq!(store.batch_delete_calls(), 3);
    assert_eq!(store.len().await, 1);
    assert!(store.exists("other/keep.txt").await.unwrap());
}

#[tokio::test]
async fn delete_folder_on_empty_prefix_issues_no_calls() {
    let store = MemoryObjectStore::new();
    fill(&store, "other/", 3).await;

    let deleted = store.delete_folder("nothing/").await.unwrap();

    assert_eq!(deleted, 0);
    assert_eq!(store.batch_delete_calls(), 0);
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn delete_batch_with_empty_list_is_a_no_op() {
    let store = MemoryObjectStore::new();
    assert_eq!(store.delete_batch(&[]).await.unwrap(), 0);
    assert_eq!(store.batch_delete_calls(), 0);
}

#[tokio::test]
async fn delete_batch_counts_exact_chunks() {
    let store = MemoryObjectStore::new();
    let keys: Vec<String> = (0..DELETE_BATCH_LIMIT + 1)
        .map(|i| format!("k/{}", i))
        .collect();
    for key in &keys {
        store
            .put(key, Bytes::from_static(b"x"), "text/plain")
            .await
            .unwrap();
    }

    let deleted = store.delete_batch(&keys).await.unwrap();
    assert_eq!(deleted, DELETE_BATCH_LIMIT + 1);
    assert_eq!(store.batch_delete_calls(), 2);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn list_returns_only_matching_prefix() {
    let store = MemoryObjectStore::new();
    fill(&store, "a/", 2).await;
    fill(&store, "ab/", 1).await;
    fill(&store, "b/", 1).await;

    let records = store.list("a/").await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.key.starts_with("a/")));

    let records = store.list("").await.unwrap();
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn get_distinguishes_not_found() {
    let store = MemoryObjectStore::new();
    store
        .put("present.txt", Bytes::from_static(b"data"), "text/plain")
        .await
        .unwrap();

    let body = store.get("present.txt").await.unwrap();
    assert_eq!(body.content_length, Some(4));
    assert_eq!(&body.collect().await.unwrap()[..], b"data");

    match store.get("absent.txt").await {
        Err(ShorthostError::ObjectNotFound(_)) => {}
        other => panic!("expected ObjectNotFound, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn exists_reports_presence_without_error() {
    let store = MemoryObjectStore::new();
    store
        .put("x/y.txt", Bytes::from_static(b"1"), "text/plain")
        .await
        .unwrap();

    assert!(store.exists("x/y.txt").await.unwrap());
    assert!(!store.exists("x/z.txt").await.unwrap());
}
