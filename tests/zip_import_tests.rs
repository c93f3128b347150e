//! ZIP import pipeline tests

use std::io::Write;

use bytes::Bytes;

use shorthost::errors::ShorthostError;
use shorthost::object_store::{MemoryObjectStore, ObjectStore};
use shorthost::services::{ImportMode, import_archive};

fn build_zip(entries: &[(&str, &[u8])]) -> Bytes {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer
                    .add_directory(name.trim_end_matches('/'), options)
                    .unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap();
    }
    Bytes::from(cursor.into_inner())
}

#[tokio::test]
async fn merge_import_uploads_every_entry() {
    let store = MemoryObjectStore::new();
    let archive = build_zip(&[
        ("index.html", b"<h1>hi</h1>".as_slice()),
        ("assets/app.js", b"console.log(1)".as_slice()),
    ]);

    let report = import_archive(&store, "sites/x/", archive, ImportMode::Merge)
        .await
        .unwrap();

    assert_eq!(report.uploaded.len(), 2);
    assert!(report.errors.is_empty());
    assert!(store.exists("sites/x/index.html").await.unwrap());
    assert!(store.exists("sites/x/assets/app.js").await.unwrap());
    assert_eq!(
        store.content_type_of("sites/x/index.html").await.as_deref(),
        Some("text/html")
    );
    assert_eq!(
        store
            .content_type_of("sites/x/assets/app.js")
            .await
            .as_deref(),
        Some("application/javascript")
    );
}

#[tokio::test]
async fn skips_directories_and_platform_metadata() {
    let store = MemoryObjectStore::new();
    let archive = build_zip(&[
        ("assets/", b"".as_slice()),
        ("__MACOSX/index.html", b"junk".as_slice()),
        ("docs/.DS_Store", b"junk".as_slice()),
        ("index.html", b"real".as_slice()),
    ]);

    let report = import_archive(&store, "sites/x/", archive, ImportMode::Merge)
        .await
        .unwrap();

    assert_eq!(report.uploaded, vec!["index.html"]);
    assert!(report.errors.is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn merge_mode_keeps_existing_objects() {
    let store = MemoryObjectStore::new();
    store
        .put("sites/x/old.txt", Bytes::from_static(b"old"), "text/plain")
        .await
        .unwrap();

    let archive = build_zip(&[("new.txt", b"new".as_slice())]);
    import_archive(&store, "sites/x/", archive, ImportMode::Merge)
        .await
        .unwrap();

    assert!(store.exists("sites/x/old.txt").await.unwrap());
    assert!(store.exists("sites/x/new.txt").await.unwrap());
}

#[tokio::test]
async fn replace_mode_clears_the_prefix_first() {
    let store = MemoryObjectStore::new();
    store
        .put("sites/x/stale.txt", Bytes::from_static(b"old"), "text/plain")
        .await
        .unwrap();
    store
        .put(
            "sites/x/deep/nested.txt",
            Bytes::from_static(b"old"),
            "text/plain",
        )
        .await
        .unwrap();
    // 其他站点的前缀不能被波及
    store
        .put("sites/y/keep.txt", Bytes::from_static(b"keep"), "text/plain")
        .await
        .unwrap();

    let archive = build_zip(&[("fresh.html", b"fresh".as_slice())]);
    let report = import_archive(&store, "sites/x/", archive, ImportMode::Replace)
        .await
        .unwrap();

    assert_eq!(report.uploaded, vec!["fresh.html"]);
    assert!(!store.exists("sites/x/stale.txt").await.unwrap());
    assert!(!store.exists("sites/x/deep/nested.txt").await.unwrap());
    assert!(store.exists("sites/x/fresh.html").await.unwrap());
    assert!(store.exists("sites/y/keep.txt").await.unwrap());
}

#[tokio::test]
async fn one_failing_entry_does_not_void_the_rest() {
    let store = MemoryObjectStore::rejecting(&["bad"]);
    let archive = build_zip(&[
        ("good.txt", b"ok".as_slice()),
        ("bad.txt", b"nope".as_slice()),
    ]);

    let report = import_archive(&store, "sites/x/", archive, ImportMode::Merge)
        .await
        .unwrap();

    assert_eq!(report.uploaded, vec!["good.txt"]);
    assert_eq!(report.errors, vec!["bad.txt"]);
    assert!(store.exists("sites/x/good.txt").await.unwrap());
    assert!(!store.exists("sites/x/bad.txt").await.unwrap());
}

#[tokio::test]
async fn entry_keys_are_normalized() {
    let store = MemoryObjectStore::new();
    let archive = build_zip(&[("docs//page.html", b"x".as_slice())]);

    import_archive(&store, "sites/x/", archive, ImportMode::Merge)
        .await
        .unwrap();

    assert!(store.exists("sites/x/docs/page.html").await.unwrap());
}

#[tokio::test]
async fn invalid_archive_is_rejected_up_front() {
    let store = MemoryObjectStore::new();

    let result = import_archive(
        &store,
        "sites/x/",
        Bytes::from_static(b"definitely not a zip"),
        ImportMode::Merge,
    )
    .await;

    match result {
        Err(ShorthostError::ArchiveRead(_)) => {}
        other => panic!("expected ArchiveRead error, got {:?}", other.map(|_| ())),
    }
    assert!(store.is_empty().await);
}
