//! Permission repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;
use depot_entity::permission::{Permission, PermissionFlags};

/// Repository for folder permission grants.
///
/// At most one row exists per (user, folder) pair.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: SqlitePool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new grant for a (user, folder) pair.
    pub async fn create(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
        flags: PermissionFlags,
    ) -> AppResult<Permission> {
        let permission = Permission {
            id: Uuid::new_v4(),
            user_id,
            folder_id,
            can_read: flags.can_read,
            can_write: flags.can_write,
            can_delete: flags.can_delete,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO permissions (id, user_id, folder_id, can_read, can_write, can_delete, \
             created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(permission.id)
        .bind(permission.user_id)
        .bind(permission.folder_id)
        .bind(permission.can_read)
        .bind(permission.can_write)
        .bind(permission.can_delete)
        .bind(permission.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::conflict("A grant already exists for this user and folder")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create permission", e),
        })?;

        Ok(permission)
    }

    /// Update the capability flags of an existing grant.
    ///
    /// Returns the number of rows changed; zero means no grant existed
    /// for the pair and the caller must decide whether that is an error.
    pub async fn update(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
        flags: PermissionFlags,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE permissions SET can_read = $3, can_write = $4, can_delete = $5 \
             WHERE user_id = $1 AND folder_id = $2",
        )
        .bind(user_id)
        .bind(folder_id)
        .bind(flags.can_read)
        .bind(flags.can_write)
        .bind(flags.can_delete)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update permission", e)
        })?;
        Ok(result.rows_affected())
    }

    /// Find the single grant for a (user, folder) pair.
    pub async fn find_by_user_and_folder(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE user_id = $1 AND folder_id = $2",
        )
        .bind(user_id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find permission", e))
    }

    /// List all grants held by a user.
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user permissions", e)
        })
    }

    /// List all grants on a folder.
    pub async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(
            "SELECT * FROM permissions WHERE folder_id = $1 ORDER BY created_at ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folder permissions", e)
        })
    }

    /// Remove the grant for a (user, folder) pair.
    pub async fn delete(&self, user_id: Uuid, folder_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permissions WHERE user_id = $1 AND folder_id = $2")
            .bind(user_id)
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete permission", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
