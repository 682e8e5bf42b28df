//! File metadata CRUD plus the move/copy/delete consistency logic.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};
use uuid::Uuid;

use depot_auth::AccessChecker;
use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_core::traits::storage::BlobStore;
use depot_database::repositories::{FileRepository, FolderRepository};
use depot_entity::file::{CreateFile, File};
use depot_entity::permission::PermissionAction;
use depot_storage::mime_from_name;

use crate::context::RequestContext;

/// Manages file placement, download, and the single-item
/// move/copy/delete operations.
#[derive(Debug, Clone)]
pub struct FileService {
    files: Arc<FileRepository>,
    folders: Arc<FolderRepository>,
    store: Arc<dyn BlobStore>,
    access: Arc<AccessChecker>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<FileRepository>,
        folders: Arc<FolderRepository>,
        store: Arc<dyn BlobStore>,
        access: Arc<AccessChecker>,
    ) -> Self {
        Self {
            files,
            folders,
            store,
            access,
        }
    }

    pub(crate) fn file_repo(&self) -> &Arc<FileRepository> {
        &self.files
    }

    pub(crate) fn folder_repo(&self) -> &Arc<FolderRepository> {
        &self.folders
    }

    pub(crate) fn access_checker(&self) -> &Arc<AccessChecker> {
        &self.access
    }

    /// Stores already-read upload bytes as a new file.
    ///
    /// Checks write access on the destination folder, writes the blob,
    /// then inserts the row. If the insert fails the blob is removed
    /// again on a best-effort basis.
    pub async fn store_upload(
        &self,
        ctx: &RequestContext,
        original_name: &str,
        mime_type: Option<String>,
        data: Bytes,
        folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let original_name = original_name.trim();
        if original_name.is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }

        let dest_dir = match folder_id {
            Some(folder) => {
                let folder_row = self
                    .folders
                    .find_by_id(folder)
                    .await?
                    .ok_or_else(|| AppError::not_found("Destination folder not found"))?;
                self.access
                    .require_access(ctx.user_id, folder_row.id, PermissionAction::Write)
                    .await?;
                folder_row.path
            }
            None => String::new(),
        };

        let storage_name = generate_storage_name(original_name);
        let storage_path = join_storage_path(&dest_dir, &storage_name);
        let mime_type = mime_type.or_else(|| mime_from_name(original_name));

        if !dest_dir.is_empty() {
            self.store.create_dir(&dest_dir).await?;
        }
        self.store.write(&storage_path, data.clone()).await?;

        let created = self
            .files
            .create(&CreateFile {
                storage_name,
                original_name: original_name.to_string(),
                storage_path: storage_path.clone(),
                size_bytes: data.len() as i64,
                mime_type,
                folder_id,
                owner_id: ctx.user_id,
            })
            .await;

        match created {
            Ok(file) => {
                info!(
                    file_id = %file.id,
                    path = %file.storage_path,
                    bytes = file.size_bytes,
                    "Stored file"
                );
                Ok(file)
            }
            Err(e) => {
                if let Err(cleanup) = self.store.remove(&storage_path).await {
                    warn!(path = %storage_path, error = %cleanup, "Failed to clean up blob");
                }
                Err(e)
            }
        }
    }

    /// Gets a file's metadata, enforcing read access.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<File> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.access
            .require_file_access(ctx.user_id, &file, PermissionAction::Read)
            .await?;

        Ok(file)
    }

    /// Reads a file's contents, enforcing read access.
    ///
    /// A row whose blob is gone is reported as `PhysicalMissing`, not
    /// `NotFound` — the metadata is intact but unusable.
    pub async fn read(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<(File, Bytes)> {
        let file = self.get_file(ctx, file_id).await?;

        if !self.store.exists(&file.storage_path).await? {
            return Err(AppError::physical_missing(format!(
                "Blob missing for file '{}'",
                file.original_name
            )));
        }

        let data = self.store.read_bytes(&file.storage_path).await?;
        Ok((file, data))
    }

    /// Lists the acting user's files in `folder_id` (None = root).
    pub async fn list_by_owner(
        &self,
        ctx: &RequestContext,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<File>> {
        self.files.find_by_owner(ctx.user_id, folder_id).await
    }

    /// Lists all files in a folder, enforcing read access on it.
    pub async fn list_by_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<Vec<File>> {
        self.access
            .require_access(ctx.user_id, folder_id, PermissionAction::Read)
            .await?;
        self.files.find_by_folder(folder_id).await
    }

    /// Moves a file to another folder (None = root).
    ///
    /// Requires read access on the source and write access on the
    /// destination folder. Moving a file to its current folder is a
    /// no-op. Only the folder reference changes; the blob stays where
    /// it was written.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.access
            .require_file_access(ctx.user_id, &file, PermissionAction::Read)
            .await?;

        if let Some(dest) = new_folder_id {
            if self.folders.find_by_id(dest).await?.is_none() {
                return Err(AppError::not_found("Destination folder not found"));
            }
            self.access
                .require_access(ctx.user_id, dest, PermissionAction::Write)
                .await?;
        }

        self.move_item(&file, new_folder_id).await
    }

    /// Copies a file into another folder (None = root).
    ///
    /// Requires read access on the source and write access on the
    /// destination folder. The copy is a distinct entity owned by the
    /// acting user, with a fresh storage name and a duplicated blob.
    pub async fn copy_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        new_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.access
            .require_file_access(ctx.user_id, &file, PermissionAction::Read)
            .await?;

        if let Some(dest) = new_folder_id {
            if self.folders.find_by_id(dest).await?.is_none() {
                return Err(AppError::not_found("Destination folder not found"));
            }
            self.access
                .require_access(ctx.user_id, dest, PermissionAction::Write)
                .await?;
        }

        self.copy_item(&file, new_folder_id, ctx.user_id).await
    }

    /// Deletes a file: blob first, then the row.
    ///
    /// Requires delete access. If the blob removal fails the row is
    /// kept, so the failure stays visible.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> AppResult<()> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.access
            .require_file_access(ctx.user_id, &file, PermissionAction::Delete)
            .await?;

        self.delete_item(&file).await
    }

    /// Move mechanics shared by the single-item and batch paths.
    ///
    /// Access checks are the caller's responsibility.
    pub(crate) async fn move_item(
        &self,
        file: &File,
        new_folder_id: Option<Uuid>,
    ) -> AppResult<File> {
        if file.folder_id == new_folder_id {
            return Ok(file.clone());
        }

        let rows = self.files.update_folder(file.id, new_folder_id).await?;
        if rows == 0 {
            return Err(AppError::not_found("File not found"));
        }

        info!(file_id = %file.id, folder_id = ?new_folder_id, "Moved file");

        let mut moved = file.clone();
        moved.folder_id = new_folder_id;
        Ok(moved)
    }

    /// Copy mechanics shared by the single-item and batch paths.
    ///
    /// The destination folder is looked up fresh here; if its row has
    /// vanished since the caller's check, the copy lands at the root
    /// rather than failing. Access checks are the caller's
    /// responsibility.
    pub(crate) async fn copy_item(
        &self,
        file: &File,
        new_folder_id: Option<Uuid>,
        new_owner_id: Uuid,
    ) -> AppResult<File> {
        if !self.store.exists(&file.storage_path).await? {
            return Err(AppError::physical_missing(format!(
                "Blob missing for file '{}'",
                file.original_name
            )));
        }

        let (dest_dir, resolved_folder_id) = match new_folder_id {
            Some(dest) => match self.folders.find_by_id(dest).await? {
                Some(folder) => (folder.path, Some(dest)),
                None => (String::new(), None),
            },
            None => (String::new(), None),
        };

        let storage_name = generate_storage_name(&file.original_name);
        let storage_path = join_storage_path(&dest_dir, &storage_name);

        if !dest_dir.is_empty() {
            self.store.create_dir(&dest_dir).await?;
        }
        self.store.copy(&file.storage_path, &storage_path).await?;

        let copy = self
            .files
            .create(&CreateFile {
                storage_name,
                original_name: file.original_name.clone(),
                storage_path,
                size_bytes: file.size_bytes,
                mime_type: file.mime_type.clone(),
                folder_id: resolved_folder_id,
                owner_id: new_owner_id,
            })
            .await?;

        info!(
            source_id = %file.id,
            copy_id = %copy.id,
            path = %copy.storage_path,
            "Copied file"
        );
        Ok(copy)
    }

    /// Delete mechanics shared by the single-item and batch paths.
    ///
    /// Access checks are the caller's responsibility.
    pub(crate) async fn delete_item(&self, file: &File) -> AppResult<()> {
        self.store.remove(&file.storage_path).await?;
        self.files.delete(file.id).await?;

        info!(file_id = %file.id, path = %file.storage_path, "Deleted file");
        Ok(())
    }
}

/// Generates a collision-resistant storage filename: millisecond
/// timestamp, a nine-digit random suffix, and the original extension.
fn generate_storage_name(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = extension_of(original_name).unwrap_or("");
    format!("{millis}-{suffix:09}{ext}")
}

/// The name's extension including the dot, if any. A leading dot alone
/// (dotfiles) does not count as an extension.
fn extension_of(name: &str) -> Option<&str> {
    let idx = name.rfind('.')?;
    if idx == 0 {
        return None;
    }
    Some(&name[idx..])
}

/// Joins a destination directory and a storage name into a relative
/// blob path; an empty directory means the upload root itself.
fn join_storage_path(dest_dir: &str, storage_name: &str) -> String {
    if dest_dir.is_empty() {
        storage_name.to_string()
    } else {
        format!("{dest_dir}/{storage_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_name_keeps_extension() {
        let name = generate_storage_name("report.pdf");
        assert!(name.ends_with(".pdf"));
        let stem = name.strip_suffix(".pdf").unwrap();
        let (millis, suffix) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 9);
        assert!(suffix.parse::<u32>().is_ok());
    }

    #[test]
    fn test_storage_name_without_extension() {
        let name = generate_storage_name("README");
        assert!(!name.contains('.'));
    }

    #[test]
    fn test_join_storage_path() {
        assert_eq!(join_storage_path("", "a.txt"), "a.txt");
        assert_eq!(join_storage_path("docs/2024", "a.txt"), "docs/2024/a.txt");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.pdf"), Some(".pdf"));
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("README"), None);
    }
}
