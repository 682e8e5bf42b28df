//! Folder repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;
use depot_entity::folder::{CreateFolder, Folder};

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new folder row.
    ///
    /// A unique violation on the canonical path surfaces as a conflict;
    /// the caller is responsible for cleaning up any physical directory
    /// it created ahead of this insert.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            path: data.path.clone(),
            parent_id: data.parent_id,
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO folders (id, name, path, parent_id, owner_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(&folder.path)
        .bind(folder.parent_id)
        .bind(folder.owner_id)
        .bind(folder.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder path '{}' already exists", data.path))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })?;

        Ok(folder)
    }

    /// Find a folder by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Find a folder by canonical path.
    pub async fn find_by_path(&self, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE path = $1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find folder by path", e)
            })
    }

    /// List folders owned by a user under the given parent
    /// (None = root level).
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<Folder>> {
        let query = match parent_id {
            Some(parent) => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE owner_id = $1 AND parent_id = $2 ORDER BY name ASC",
            )
            .bind(owner_id)
            .bind(parent),
            None => sqlx::query_as::<_, Folder>(
                "SELECT * FROM folders WHERE owner_id = $1 AND parent_id IS NULL ORDER BY name ASC",
            )
            .bind(owner_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Unfiltered enumeration of every folder (admin-facing).
    pub async fn list_all(&self) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders ORDER BY path ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// Delete a folder row (cascades to descendant folders, files, and
    /// grants).
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
