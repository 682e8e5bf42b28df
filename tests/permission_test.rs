//! Grant administration and the access-control evaluator.

mod common;

use bytes::Bytes;
use uuid::Uuid;

use depot_core::error::ErrorKind;
use depot_entity::permission::{PermissionAction, PermissionFlags};

use common::TestApp;

fn flags(can_read: bool, can_write: bool, can_delete: bool) -> PermissionFlags {
    PermissionFlags {
        can_read,
        can_write,
        can_delete,
    }
}

#[tokio::test]
async fn admin_and_owner_always_pass() {
    let app = TestApp::new().await;
    let (alice, alice_ctx) = app.register_user("alice").await;
    let (admin, _) = app.register_admin("root").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();

    for action in [
        PermissionAction::Read,
        PermissionAction::Write,
        PermissionAction::Delete,
    ] {
        assert!(app
            .access
            .check_access(alice.id, docs.id, action)
            .await
            .unwrap());
        assert!(app
            .access
            .check_access(admin.id, docs.id, action)
            .await
            .unwrap());
    }
}

#[tokio::test]
async fn admin_passes_even_for_missing_folder() {
    let app = TestApp::new().await;
    let (admin, _) = app.register_admin("root").await;
    let (bob, _) = app.register_user("bob").await;

    let ghost = Uuid::new_v4();
    assert!(app
        .access
        .check_access(admin.id, ghost, PermissionAction::Read)
        .await
        .unwrap());
    // A non-admin against a missing folder is denied, not an error.
    assert!(!app
        .access
        .check_access(bob.id, ghost, PermissionAction::Read)
        .await
        .unwrap());
}

#[tokio::test]
async fn grant_flags_are_independent() {
    let app = TestApp::new().await;
    let (_, alice_ctx) = app.register_user("alice").await;
    let (bob, _) = app.register_user("bob").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();

    // Every flag combination grants exactly the actions it names.
    for &(r, w, d) in &[
        (false, false, false),
        (true, false, false),
        (false, true, false),
        (false, false, true),
        (true, true, false),
        (true, false, true),
        (false, true, true),
        (true, true, true),
    ] {
        app.permission_service
            .grant(&alice_ctx, bob.id, docs.id, flags(r, w, d))
            .await
            .unwrap();

        let read = app
            .access
            .check_access(bob.id, docs.id, PermissionAction::Read)
            .await
            .unwrap();
        let write = app
            .access
            .check_access(bob.id, docs.id, PermissionAction::Write)
            .await
            .unwrap();
        let delete = app
            .access
            .check_access(bob.id, docs.id, PermissionAction::Delete)
            .await
            .unwrap();

        assert_eq!((read, write, delete), (r, w, d));
    }
}

#[tokio::test]
async fn no_grant_means_deny() {
    let app = TestApp::new().await;
    let (_, alice_ctx) = app.register_user("alice").await;
    let (bob, _) = app.register_user("bob").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();

    assert!(!app
        .access
        .check_access(bob.id, docs.id, PermissionAction::Read)
        .await
        .unwrap());
}

#[tokio::test]
async fn grants_do_not_inherit_to_subfolders() {
    let app = TestApp::new().await;
    let (_, alice_ctx) = app.register_user("alice").await;
    let (bob, _) = app.register_user("bob").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();
    let year = app
        .folder_service
        .create_folder(&alice_ctx, "2024", Some(docs.id))
        .await
        .unwrap();

    app.permission_service
        .grant(&alice_ctx, bob.id, docs.id, flags(true, true, true))
        .await
        .unwrap();

    assert!(app
        .access
        .check_access(bob.id, docs.id, PermissionAction::Read)
        .await
        .unwrap());
    assert!(!app
        .access
        .check_access(bob.id, year.id, PermissionAction::Read)
        .await
        .unwrap());
}

#[tokio::test]
async fn regrant_updates_in_place() {
    let app = TestApp::new().await;
    let (_, alice_ctx) = app.register_user("alice").await;
    let (bob, _) = app.register_user("bob").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();

    let first = app
        .permission_service
        .grant(&alice_ctx, bob.id, docs.id, flags(true, false, false))
        .await
        .unwrap();
    let second = app
        .permission_service
        .grant(&alice_ctx, bob.id, docs.id, flags(true, true, false))
        .await
        .unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(app.permissions.find_by_folder(docs.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn grant_requires_existing_subject_and_folder() {
    let app = TestApp::new().await;
    let (_, admin_ctx) = app.register_admin("root").await;
    let (bob, _) = app.register_user("bob").await;

    let err = app
        .permission_service
        .grant(&admin_ctx, Uuid::new_v4(), Uuid::new_v4(), flags(true, false, false))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .permission_service
        .grant(&admin_ctx, bob.id, Uuid::new_v4(), flags(true, false, false))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn only_admin_or_owner_manage_grants() {
    let app = TestApp::new().await;
    let (_, alice_ctx) = app.register_user("alice").await;
    let (bob, bob_ctx) = app.register_user("bob").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();

    let err = app
        .permission_service
        .grant(&bob_ctx, bob.id, docs.id, flags(true, true, true))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn update_requires_an_existing_grant() {
    let app = TestApp::new().await;
    let (_, alice_ctx) = app.register_user("alice").await;
    let (bob, _) = app.register_user("bob").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();

    let err = app
        .permission_service
        .update(&alice_ctx, bob.id, docs.id, flags(true, false, false))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn revoke_reports_whether_a_row_was_removed() {
    let app = TestApp::new().await;
    let (_, alice_ctx) = app.register_user("alice").await;
    let (bob, _) = app.register_user("bob").await;

    let docs = app
        .folder_service
        .create_folder(&alice_ctx, "Docs", None)
        .await
        .unwrap();

    assert!(!app
        .permission_service
        .revoke(&alice_ctx, bob.id, docs.id)
        .await
        .unwrap());

    app.permission_service
        .grant(&alice_ctx, bob.id, docs.id, PermissionFlags::default())
        .await
        .unwrap();
    assert!(app
        .permission_service
        .revoke(&alice_ctx, bob.id, docs.id)
        .await
        .unwrap());
    assert!(!app
        .access
        .check_access(bob.id, docs.id, PermissionAction::Read)
        .await
        .unwrap());
}

#[tokio::test]
async fn shared_folder_end_to_end() {
    let app = TestApp::new().await;
    let (_, alice) = app.register_user("alice").await;
    let (bob, bob_ctx) = app.register_user("bob").await;
    let (_, admin) = app.register_admin("root").await;

    let docs = app
        .folder_service
        .create_folder(&alice, "Docs", None)
        .await
        .unwrap();
    let year = app
        .folder_service
        .create_folder(&alice, "2024", Some(docs.id))
        .await
        .unwrap();
    let report = app
        .file_service
        .store_upload(&alice, "report.pdf", None, Bytes::from("pdf"), Some(year.id))
        .await
        .unwrap();

    // No grant: denied.
    assert!(!app
        .access
        .check_access(bob.id, year.id, PermissionAction::Read)
        .await
        .unwrap());

    // Admin grants read: bob can download.
    app.permission_service
        .grant(&admin, bob.id, year.id, flags(true, false, false))
        .await
        .unwrap();
    assert!(app
        .access
        .check_access(bob.id, year.id, PermissionAction::Read)
        .await
        .unwrap());
    let (_, data) = app.file_service.read(&bob_ctx, report.id).await.unwrap();
    assert_eq!(data, Bytes::from("pdf"));

    // No delete flag: delete denied.
    let err = app
        .file_service
        .delete_file(&bob_ctx, report.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    // Admin raises the grant: bob deletes, row and blob both go.
    app.permission_service
        .update(&admin, bob.id, year.id, flags(true, false, true))
        .await
        .unwrap();
    app.file_service.delete_file(&bob_ctx, report.id).await.unwrap();

    assert!(app.files.find_by_id(report.id).await.unwrap().is_none());
    assert!(!app.blob_path(&report.storage_path).exists());
    let listing = app
        .file_service
        .list_by_folder(&alice, year.id)
        .await
        .unwrap();
    assert!(listing.is_empty());
}
