//! Folder CRUD with canonical-path rules and physical mirroring.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use depot_auth::AccessChecker;
use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_core::traits::storage::BlobStore;
use depot_database::repositories::FolderRepository;
use depot_entity::folder::{CreateFolder, Folder};
use depot_entity::permission::PermissionAction;

use crate::context::RequestContext;

/// Manages folder creation, lookup, enumeration, and deletion.
///
/// Each folder row is mirrored by a physical directory at
/// `upload_root/canonical_path`; the directory is created before the row
/// and removed before the row is deleted.
#[derive(Debug, Clone)]
pub struct FolderService {
    folders: Arc<FolderRepository>,
    store: Arc<dyn BlobStore>,
    access: Arc<AccessChecker>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<FolderRepository>,
        store: Arc<dyn BlobStore>,
        access: Arc<AccessChecker>,
    ) -> Self {
        Self {
            folders,
            store,
            access,
        }
    }

    /// Creates a folder under `parent_id` (None = root level).
    ///
    /// The canonical path is `parent.path + "/" + trimmed_name`, or the
    /// trimmed name alone at root. Sibling names are unique per owner
    /// and parent, case-insensitively; the resolved path is unique
    /// globally. The physical directory is created first and removed
    /// again if the row insert fails.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }

        let path = match parent_id {
            Some(parent) => {
                let parent_folder = self
                    .folders
                    .find_by_id(parent)
                    .await?
                    .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
                self.access
                    .require_access(ctx.user_id, parent_folder.id, PermissionAction::Write)
                    .await?;
                format!("{}/{}", parent_folder.path, trimmed)
            }
            None => trimmed.to_string(),
        };

        let siblings = self.folders.find_by_owner(ctx.user_id, parent_id).await?;
        if siblings
            .iter()
            .any(|s| s.name.eq_ignore_ascii_case(trimmed))
        {
            return Err(AppError::conflict(format!(
                "A folder named '{trimmed}' already exists here"
            )));
        }

        // The path space is global, beyond the per-owner sibling check.
        if self.folders.find_by_path(&path).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Folder path '{path}' already exists"
            )));
        }

        self.store.create_dir(&path).await?;

        let created = self
            .folders
            .create(&CreateFolder {
                name: trimmed.to_string(),
                path: path.clone(),
                parent_id,
                owner_id: ctx.user_id,
            })
            .await;

        match created {
            Ok(folder) => {
                info!(folder_id = %folder.id, path = %folder.path, "Created folder");
                Ok(folder)
            }
            Err(e) => {
                // Best-effort cleanup of the directory created above.
                if let Err(cleanup) = self.store.remove_dir(&path).await {
                    warn!(path = %path, error = %cleanup, "Failed to clean up folder directory");
                }
                Err(e)
            }
        }
    }

    /// Gets a folder by ID, enforcing read access.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        self.access
            .require_access(ctx.user_id, folder_id, PermissionAction::Read)
            .await?;

        Ok(folder)
    }

    /// Gets a folder by canonical path, enforcing read access.
    pub async fn get_folder_by_path(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> AppResult<Folder> {
        let folder = self
            .folders
            .find_by_path(path)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        self.access
            .require_access(ctx.user_id, folder.id, PermissionAction::Read)
            .await?;

        Ok(folder)
    }

    /// Lists the acting user's folders under `parent_id` (None = root).
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        parent_id: Option<Uuid>,
    ) -> AppResult<Vec<Folder>> {
        self.folders.find_by_owner(ctx.user_id, parent_id).await
    }

    /// Unfiltered enumeration of every folder. Admin only.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Folder>> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin role required"));
        }
        self.folders.list_all().await
    }

    /// Deletes a folder, its physical directory tree, and (via cascade)
    /// all descendant folders, files, and grants.
    ///
    /// The directory is removed first; if that fails, the rows stay.
    pub async fn delete_folder(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<()> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        self.access
            .require_access(ctx.user_id, folder_id, PermissionAction::Delete)
            .await?;

        self.store.remove_dir(&folder.path).await?;
        self.folders.delete(folder_id).await?;

        info!(folder_id = %folder_id, path = %folder.path, "Deleted folder");
        Ok(())
    }
}
