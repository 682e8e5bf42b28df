//! Upload placement, download, and move/copy/delete consistency.

mod common;

use std::sync::atomic::Ordering;

use bytes::Bytes;

use depot_core::error::ErrorKind;

use common::{CountingStore, FailingRemoveStore, TestApp};

#[tokio::test]
async fn upload_writes_blob_then_row() {
    let app = TestApp::new().await;
    let (user, ctx) = app.register_user("alice").await;

    let docs = app
        .folder_service
        .create_folder(&ctx, "Docs", None)
        .await
        .unwrap();
    let file = app
        .file_service
        .store_upload(&ctx, "report.pdf", None, Bytes::from("pdf bytes"), Some(docs.id))
        .await
        .unwrap();

    assert_eq!(file.original_name, "report.pdf");
    assert_eq!(file.owner_id, user.id);
    assert_eq!(file.folder_id, Some(docs.id));
    assert_eq!(file.size_bytes, 9);
    assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
    assert!(file.storage_name.ends_with(".pdf"));
    assert!(file.storage_path.starts_with("Docs/"));
    assert!(app.blob_path(&file.storage_path).is_file());
}

#[tokio::test]
async fn upload_to_root_has_no_directory_prefix() {
    let app = TestApp::new().await;
    let (_, ctx) = app.register_user("alice").await;

    let file = app
        .file_service
        .store_upload(&ctx, "notes.txt", None, Bytes::from("hi"), None)
        .await
        .unwrap();

    assert!(file.folder_id.is_none());
    assert!(!file.storage_path.contains('/'));
}

#[tokio::test]
async fn read_returns_bytes_and_flags_missing_blob() {
    let app = TestApp::new().await;
    let (_, ctx) = app.register_user("alice").await;

    let file = app
        .file_service
        .store_upload(&ctx, "notes.txt", None, Bytes::from("hello"), None)
        .await
        .unwrap();

    let (_, data) = app.file_service.read(&ctx, file.id).await.unwrap();
    assert_eq!(data, Bytes::from("hello"));

    std::fs::remove_file(app.blob_path(&file.storage_path)).unwrap();

    let err = app.file_service.read(&ctx, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::PhysicalMissing);
    // The row itself is still intact.
    assert!(app.files.find_by_id(file.id).await.unwrap().is_some());
}

#[tokio::test]
async fn move_updates_folder_reference_only() {
    let app = TestApp::new().await;
    let (_, ctx) = app.register_user("alice").await;

    let docs = app
        .folder_service
        .create_folder(&ctx, "Docs", None)
        .await
        .unwrap();
    let file = app
        .file_service
        .store_upload(&ctx, "notes.txt", None, Bytes::from("hi"), None)
        .await
        .unwrap();

    let moved = app
        .file_service
        .move_file(&ctx, file.id, Some(docs.id))
        .await
        .unwrap();

    assert_eq!(moved.folder_id, Some(docs.id));
    // The blob stays where it was written; only the logical parent changes.
    assert_eq!(moved.storage_path, file.storage_path);
    assert!(app.blob_path(&file.storage_path).is_file());
}

#[tokio::test]
async fn move_to_current_folder_is_a_pure_noop() {
    let mut mutations = None;
    let app = TestApp::with_store(|inner| {
        let (store, counter) = CountingStore::wrap(inner);
        mutations = Some(counter);
        store
    })
    .await;
    let mutations = mutations.unwrap();
    let (_, ctx) = app.register_user("alice").await;

    let file = app
        .file_service
        .store_upload(&ctx, "notes.txt", None, Bytes::from("hi"), None)
        .await
        .unwrap();

    let before = mutations.load(Ordering::SeqCst);
    let unchanged = app.file_service.move_file(&ctx, file.id, None).await.unwrap();

    assert_eq!(unchanged.id, file.id);
    assert_eq!(unchanged.folder_id, file.folder_id);
    assert_eq!(mutations.load(Ordering::SeqCst), before);
}

#[tokio::test]
async fn copy_produces_a_distinct_entity() {
    let app = TestApp::new().await;
    let (_, alice) = app.register_user("alice").await;

    let docs = app
        .folder_service
        .create_folder(&alice, "Docs", None)
        .await
        .unwrap();
    let source = app
        .file_service
        .store_upload(
            &alice,
            "report.pdf",
            Some("application/pdf".to_string()),
            Bytes::from("pdf bytes"),
            None,
        )
        .await
        .unwrap();

    let copy = app
        .file_service
        .copy_file(&alice, source.id, Some(docs.id))
        .await
        .unwrap();

    assert_ne!(copy.id, source.id);
    assert_ne!(copy.storage_path, source.storage_path);
    assert_eq!(copy.original_name, source.original_name);
    assert_eq!(copy.size_bytes, source.size_bytes);
    assert_eq!(copy.mime_type, source.mime_type);
    assert_eq!(copy.folder_id, Some(docs.id));

    // Source untouched, copy byte-identical.
    let original = app.files.find_by_id(source.id).await.unwrap().unwrap();
    assert_eq!(original.storage_path, source.storage_path);
    assert_eq!(original.owner_id, source.owner_id);
    let src_bytes = std::fs::read(app.blob_path(&source.storage_path)).unwrap();
    let copy_bytes = std::fs::read(app.blob_path(&copy.storage_path)).unwrap();
    assert_eq!(src_bytes, copy_bytes);
}

#[tokio::test]
async fn copy_without_source_blob_is_physical_missing() {
    let app = TestApp::new().await;
    let (_, ctx) = app.register_user("alice").await;

    let file = app
        .file_service
        .store_upload(&ctx, "notes.txt", None, Bytes::from("hi"), None)
        .await
        .unwrap();
    std::fs::remove_file(app.blob_path(&file.storage_path)).unwrap();

    let err = app
        .file_service
        .copy_file(&ctx, file.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PhysicalMissing);
}

#[tokio::test]
async fn delete_removes_blob_and_row() {
    let app = TestApp::new().await;
    let (_, ctx) = app.register_user("alice").await;

    let file = app
        .file_service
        .store_upload(&ctx, "notes.txt", None, Bytes::from("hi"), None)
        .await
        .unwrap();

    app.file_service.delete_file(&ctx, file.id).await.unwrap();

    assert!(app.files.find_by_id(file.id).await.unwrap().is_none());
    assert!(!app.blob_path(&file.storage_path).exists());
}

#[tokio::test]
async fn failed_blob_removal_keeps_the_row() {
    let app = TestApp::with_store(FailingRemoveStore::wrap).await;
    let (_, ctx) = app.register_user("alice").await;

    let file = app
        .file_service
        .store_upload(&ctx, "notes.txt", None, Bytes::from("hi"), None)
        .await
        .unwrap();

    let err = app.file_service.delete_file(&ctx, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Storage);

    // The row must survive a failed physical removal.
    assert!(app.files.find_by_id(file.id).await.unwrap().is_some());
}

#[tokio::test]
async fn root_files_are_owner_only() {
    let app = TestApp::new().await;
    let (_, alice) = app.register_user("alice").await;
    let (_, bob) = app.register_user("bob").await;

    let file = app
        .file_service
        .store_upload(&alice, "notes.txt", None, Bytes::from("hi"), None)
        .await
        .unwrap();

    let err = app.file_service.read(&bob, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}
