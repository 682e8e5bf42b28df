//! Schema creation for the four Depot entities.
//!
//! Applied idempotently at startup. Foreign-key cascade deletes mirror
//! the ownership graph: deleting a user removes their folders, files, and
//! grants; deleting a folder removes descendant folders, contained files,
//! and grants on it.

use sqlx::SqlitePool;
use tracing::info;

use depot_core::error::{AppError, ErrorKind};

/// The `CREATE TABLE` statements, in dependency order.
const TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users ( \
        id BLOB PRIMARY KEY, \
        username TEXT UNIQUE NOT NULL, \
        email TEXT UNIQUE NOT NULL, \
        password_hash TEXT NOT NULL, \
        role TEXT NOT NULL DEFAULT 'user', \
        created_at TEXT NOT NULL \
     )",
    "CREATE TABLE IF NOT EXISTS folders ( \
        id BLOB PRIMARY KEY, \
        name TEXT NOT NULL, \
        path TEXT UNIQUE NOT NULL, \
        parent_id BLOB, \
        owner_id BLOB NOT NULL, \
        created_at TEXT NOT NULL, \
        FOREIGN KEY (parent_id) REFERENCES folders(id) ON DELETE CASCADE, \
        FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE \
     )",
    "CREATE TABLE IF NOT EXISTS files ( \
        id BLOB PRIMARY KEY, \
        storage_name TEXT NOT NULL, \
        original_name TEXT NOT NULL, \
        storage_path TEXT UNIQUE NOT NULL, \
        size_bytes INTEGER NOT NULL, \
        mime_type TEXT, \
        folder_id BLOB, \
        owner_id BLOB NOT NULL, \
        created_at TEXT NOT NULL, \
        FOREIGN KEY (folder_id) REFERENCES folders(id) ON DELETE CASCADE, \
        FOREIGN KEY (owner_id) REFERENCES users(id) ON DELETE CASCADE \
     )",
    "CREATE TABLE IF NOT EXISTS permissions ( \
        id BLOB PRIMARY KEY, \
        user_id BLOB NOT NULL, \
        folder_id BLOB NOT NULL, \
        can_read INTEGER NOT NULL DEFAULT 1, \
        can_write INTEGER NOT NULL DEFAULT 0, \
        can_delete INTEGER NOT NULL DEFAULT 0, \
        created_at TEXT NOT NULL, \
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE, \
        FOREIGN KEY (folder_id) REFERENCES folders(id) ON DELETE CASCADE, \
        UNIQUE(user_id, folder_id) \
     )",
];

/// Create all tables if they do not already exist.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), AppError> {
    for statement in TABLES {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create schema", e)
        })?;
    }
    info!("Database schema ready");
    Ok(())
}
