//! File repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use depot_core::error::{AppError, ErrorKind};
use depot_core::result::AppResult;
use depot_entity::file::{CreateFile, File};

/// Repository for file metadata CRUD.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new file row.
    ///
    /// The physical blob must already exist at the given storage path.
    pub async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let file = File {
            id: Uuid::new_v4(),
            storage_name: data.storage_name.clone(),
            original_name: data.original_name.clone(),
            storage_path: data.storage_path.clone(),
            size_bytes: data.size_bytes,
            mime_type: data.mime_type.clone(),
            folder_id: data.folder_id,
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO files (id, storage_name, original_name, storage_path, size_bytes, \
             mime_type, folder_id, owner_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(file.id)
        .bind(&file.storage_name)
        .bind(&file.original_name)
        .bind(&file.storage_path)
        .bind(file.size_bytes)
        .bind(&file.mime_type)
        .bind(file.folder_id)
        .bind(file.owner_id)
        .bind(file.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => AppError::conflict(format!(
                "Storage path '{}' already exists",
                data.storage_path
            )),
            _ => AppError::with_source(ErrorKind::Database, "Failed to create file", e),
        })?;

        Ok(file)
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// List files owned by a user in the given folder (None = root level).
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<File>> {
        let query = match folder_id {
            Some(folder) => sqlx::query_as::<_, File>(
                "SELECT * FROM files WHERE owner_id = $1 AND folder_id = $2 \
                 ORDER BY original_name ASC",
            )
            .bind(owner_id)
            .bind(folder),
            None => sqlx::query_as::<_, File>(
                "SELECT * FROM files WHERE owner_id = $1 AND folder_id IS NULL \
                 ORDER BY original_name ASC",
            )
            .bind(owner_id),
        };

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List all files in a folder regardless of owner.
    pub async fn find_by_folder(&self, folder_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE folder_id = $1 ORDER BY original_name ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folder files", e))
    }

    /// Update only a file's parent folder reference.
    ///
    /// The physical blob is intentionally not relocated. Returns the
    /// number of rows changed.
    pub async fn update_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> AppResult<u64> {
        let result = sqlx::query("UPDATE files SET folder_id = $2 WHERE id = $1")
            .bind(id)
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move file", e))?;
        Ok(result.rows_affected())
    }

    /// Delete a file row.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }
}
