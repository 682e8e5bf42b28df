//! Folder-scoped access checking.
//!
//! Access is evaluated per folder, in order: admin role, folder
//! ownership, then the explicit grant row for the (user, folder) pair.
//! Grants do not inherit from parent folders; each folder carries its
//! own rows.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_database::repositories::{FolderRepository, PermissionRepository, UserRepository};
use depot_entity::file::File;
use depot_entity::permission::PermissionAction;

/// Evaluates whether a user may perform an action on a folder.
#[derive(Debug, Clone)]
pub struct AccessChecker {
    users: Arc<UserRepository>,
    folders: Arc<FolderRepository>,
    permissions: Arc<PermissionRepository>,
}

impl AccessChecker {
    /// Creates a new access checker.
    pub fn new(
        users: Arc<UserRepository>,
        folders: Arc<FolderRepository>,
        permissions: Arc<PermissionRepository>,
    ) -> Self {
        Self {
            users,
            folders,
            permissions,
        }
    }

    /// Checks whether a user may perform `action` on the given folder.
    ///
    /// Admins and folder owners are always allowed. Everyone else needs
    /// a grant row with the matching capability flag. A missing folder
    /// or missing grant denies rather than erroring; only the user row
    /// is required to exist.
    pub async fn check_access(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
        action: PermissionAction,
    ) -> AppResult<bool> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.role.is_admin() {
            return Ok(true);
        }

        let folder = match self.folders.find_by_id(folder_id).await? {
            Some(folder) => folder,
            None => return Ok(false),
        };

        if folder.owner_id == user_id {
            return Ok(true);
        }

        let grant = self
            .permissions
            .find_by_user_and_folder(user_id, folder_id)
            .await?;

        let allowed = grant.map(|g| g.allows(action)).unwrap_or(false);
        debug!(%user_id, %folder_id, ?action, allowed, "Evaluated folder access");
        Ok(allowed)
    }

    /// Like [`check_access`](Self::check_access) but returns an
    /// authorization error on denial.
    pub async fn require_access(
        &self,
        user_id: Uuid,
        folder_id: Uuid,
        action: PermissionAction,
    ) -> AppResult<()> {
        if self.check_access(user_id, folder_id, action).await? {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Not allowed to {} in this folder",
                action.as_str()
            )))
        }
    }

    /// Checks whether a user may perform `action` on a file.
    ///
    /// Admins and the file owner are always allowed. For other users
    /// the check delegates to the containing folder's grants; files at
    /// the root level have no folder to carry grants, so they are
    /// owner-and-admin only.
    pub async fn check_file_access(
        &self,
        user_id: Uuid,
        file: &File,
        action: PermissionAction,
    ) -> AppResult<bool> {
        if file.owner_id == user_id {
            return Ok(true);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.role.is_admin() {
            return Ok(true);
        }

        match file.folder_id {
            Some(folder_id) => self.check_access(user_id, folder_id, action).await,
            None => Ok(false),
        }
    }

    /// Like [`check_file_access`](Self::check_file_access) but returns
    /// an authorization error on denial.
    pub async fn require_file_access(
        &self,
        user_id: Uuid,
        file: &File,
        action: PermissionAction,
    ) -> AppResult<()> {
        if self.check_file_access(user_id, file, action).await? {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Not allowed to {} this file",
                action.as_str()
            )))
        }
    }
}
