//! Shared helpers for service-level integration tests.
//!
//! Each test gets a fresh in-memory SQLite database and a tempdir
//! upload root, with all services wired the same way the server binary
//! wires them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::TempDir;

use depot_auth::{AccessChecker, JwtEncoder, PasswordHasher};
use depot_core::config::AuthConfig;
use depot_core::result::AppResult;
use depot_core::traits::storage::BlobStore;
use depot_core::AppError;
use depot_database::repositories::{
    FileRepository, FolderRepository, PermissionRepository, UserRepository,
};
use depot_database::{schema, DatabasePool};
use depot_entity::user::{User, UserRole};
use depot_service::{
    FileService, FolderService, PermissionService, RequestContext, UserService,
};
use depot_storage::LocalBlobStore;

/// Fully wired application under test.
pub struct TestApp {
    pub db: DatabasePool,
    pub upload_dir: TempDir,
    pub users: Arc<UserRepository>,
    pub folders: Arc<FolderRepository>,
    pub files: Arc<FileRepository>,
    pub permissions: Arc<PermissionRepository>,
    pub access: Arc<AccessChecker>,
    pub user_service: UserService,
    pub folder_service: FolderService,
    pub file_service: FileService,
    pub permission_service: PermissionService,
}

impl TestApp {
    /// Builds a test app with the plain local blob store.
    pub async fn new() -> Self {
        Self::with_store(|inner| inner).await
    }

    /// Builds a test app whose blob store is wrapped by `wrap` (for
    /// counting or fault-injecting stores).
    pub async fn with_store<F>(wrap: F) -> Self
    where
        F: FnOnce(Arc<dyn BlobStore>) -> Arc<dyn BlobStore>,
    {
        let db = DatabasePool::connect_in_memory()
            .await
            .expect("Failed to open in-memory database");
        schema::create_tables(db.pool())
            .await
            .expect("Failed to create tables");

        let upload_dir = tempfile::tempdir().expect("Failed to create upload root");
        let local = LocalBlobStore::new(upload_dir.path().to_str().unwrap())
            .await
            .expect("Failed to init blob store");
        let store = wrap(Arc::new(local));

        let users = Arc::new(UserRepository::new(db.pool().clone()));
        let folders = Arc::new(FolderRepository::new(db.pool().clone()));
        let files = Arc::new(FileRepository::new(db.pool().clone()));
        let permissions = Arc::new(PermissionRepository::new(db.pool().clone()));

        let access = Arc::new(AccessChecker::new(
            users.clone(),
            folders.clone(),
            permissions.clone(),
        ));

        let auth_config = AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl_hours: 1,
            password_min_length: 6,
        };
        let hasher = Arc::new(PasswordHasher::new());
        let encoder = Arc::new(JwtEncoder::new(&auth_config));

        let user_service = UserService::new(users.clone(), hasher, encoder, &auth_config);
        let folder_service = FolderService::new(folders.clone(), store.clone(), access.clone());
        let file_service = FileService::new(
            files.clone(),
            folders.clone(),
            store.clone(),
            access.clone(),
        );
        let permission_service =
            PermissionService::new(users.clone(), folders.clone(), permissions.clone());

        Self {
            db,
            upload_dir,
            users,
            folders,
            files,
            permissions,
            access,
            user_service,
            folder_service,
            file_service,
            permission_service,
        }
    }

    /// Registers a regular user and returns it with a request context.
    pub async fn register_user(&self, username: &str) -> (User, RequestContext) {
        let user = self
            .user_service
            .register(username, &format!("{username}@example.com"), "hunter22")
            .await
            .expect("Failed to register user");
        let ctx = RequestContext::new(user.id, user.role, user.username.clone());
        (user, ctx)
    }

    /// Registers an admin and returns it with a request context.
    pub async fn register_admin(&self, username: &str) -> (User, RequestContext) {
        let user = self
            .user_service
            .register_with_role(
                username,
                &format!("{username}@example.com"),
                "hunter22",
                UserRole::Admin,
            )
            .await
            .expect("Failed to register admin");
        let ctx = RequestContext::new(user.id, user.role, user.username.clone());
        (user, ctx)
    }

    /// Absolute path of a blob beneath the upload root.
    pub fn blob_path(&self, storage_path: &str) -> std::path::PathBuf {
        self.upload_dir.path().join(storage_path)
    }
}

/// Blob store wrapper that counts mutating physical operations.
#[derive(Debug)]
pub struct CountingStore {
    inner: Arc<dyn BlobStore>,
    mutations: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn wrap(inner: Arc<dyn BlobStore>) -> (Arc<dyn BlobStore>, Arc<AtomicUsize>) {
        let mutations = Arc::new(AtomicUsize::new(0));
        let store = Arc::new(Self {
            inner,
            mutations: mutations.clone(),
        });
        (store, mutations)
    }

    fn bump(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for CountingStore {
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(path).await
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.bump();
        self.inner.write(path, data).await
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        self.bump();
        self.inner.copy(from, to).await
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        self.bump();
        self.inner.remove(path).await
    }

    async fn remove_dir(&self, path: &str) -> AppResult<()> {
        self.bump();
        self.inner.remove_dir(path).await
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        self.bump();
        self.inner.create_dir(path).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

/// Blob store wrapper whose `remove` always fails, for testing the
/// blob-removal-before-row-delete policy.
#[derive(Debug)]
pub struct FailingRemoveStore {
    inner: Arc<dyn BlobStore>,
}

impl FailingRemoveStore {
    pub fn wrap(inner: Arc<dyn BlobStore>) -> Arc<dyn BlobStore> {
        Arc::new(Self { inner })
    }
}

#[async_trait]
impl BlobStore for FailingRemoveStore {
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(path).await
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.inner.write(path, data).await
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        self.inner.copy(from, to).await
    }

    async fn remove(&self, _path: &str) -> AppResult<()> {
        Err(AppError::storage("Simulated removal fault"))
    }

    async fn remove_dir(&self, path: &str) -> AppResult<()> {
        self.inner.remove_dir(path).await
    }

    async fn create_dir(&self, path: &str) -> AppResult<()> {
        self.inner.create_dir(path).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}
