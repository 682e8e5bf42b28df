//! Depot server entry point.
//!
//! Wires configuration, the database pool, the blob store, and the
//! services together, then waits for shutdown. HTTP routing sits on
//! top of the services and lives outside this core.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use depot_auth::{AccessChecker, JwtDecoder, JwtEncoder, PasswordHasher};
use depot_core::config::AppConfig;
use depot_core::error::AppError;
use depot_core::traits::storage::BlobStore;
use depot_database::repositories::{
    FileRepository, FolderRepository, PermissionRepository, UserRepository,
};
use depot_database::{schema, DatabasePool};
use depot_service::{FileService, FolderService, PermissionService, UserService};
use depot_storage::LocalBlobStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("DEPOT_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with the configured level and format.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Depot v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;
    schema::create_tables(db.pool()).await?;
    tracing::info!("Database ready");

    tracing::info!(root = %config.storage.upload_root, "Initializing blob store...");
    let store: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(&config.storage.upload_root).await?);

    let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
    let folder_repo = Arc::new(FolderRepository::new(db.pool().clone()));
    let file_repo = Arc::new(FileRepository::new(db.pool().clone()));
    let permission_repo = Arc::new(PermissionRepository::new(db.pool().clone()));

    let hasher = Arc::new(PasswordHasher::new());
    let encoder = Arc::new(JwtEncoder::new(&config.auth));
    let _decoder = JwtDecoder::new(&config.auth);

    let access = Arc::new(AccessChecker::new(
        user_repo.clone(),
        folder_repo.clone(),
        permission_repo.clone(),
    ));

    let _user_service = UserService::new(user_repo.clone(), hasher, encoder, &config.auth);
    let _folder_service = FolderService::new(folder_repo.clone(), store.clone(), access.clone());
    let _file_service = FileService::new(
        file_repo.clone(),
        folder_repo.clone(),
        store.clone(),
        access.clone(),
    );
    let _permission_service = PermissionService::new(user_repo, folder_repo, permission_repo);

    tracing::info!("Depot core initialized; waiting for shutdown signal");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown: {e}")))?;

    tracing::info!("Shutting down");
    db.close().await;
    Ok(())
}
