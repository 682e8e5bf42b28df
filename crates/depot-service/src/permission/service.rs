//! Grant administration: upsert, update, revoke, and listing.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_database::repositories::{FolderRepository, PermissionRepository, UserRepository};
use depot_entity::permission::{Permission, PermissionFlags};

use crate::context::RequestContext;

/// Manages grants on folders.
///
/// Grants may be managed by admins or by the target folder's owner.
#[derive(Debug, Clone)]
pub struct PermissionService {
    users: Arc<UserRepository>,
    folders: Arc<FolderRepository>,
    permissions: Arc<PermissionRepository>,
}

impl PermissionService {
    /// Creates a new permission service.
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

    /// Grants capabilities on a folder to a user.
    ///
    /// Both the subject user and the folder must exist. Re-granting an
    /// existing pair updates the flags in place rather than erroring.
    pub async fn grant(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        folder_id: Uuid,
        flags: PermissionFlags,
    ) -> AppResult<Permission> {
        self.require_manager(ctx, folder_id).await?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }
        if self.folders.find_by_id(folder_id).await?.is_none() {
            return Err(AppError::not_found("Folder not found"));
        }

        let permission = match self
            .permissions
            .find_by_user_and_folder(user_id, folder_id)
            .await?
        {
            Some(existing) => {
                self.permissions.update(user_id, folder_id, flags).await?;
                Permission {
                    can_read: flags.can_read,
                    can_write: flags.can_write,
                    can_delete: flags.can_delete,
                    ..existing
                }
            }
            None => self.permissions.create(user_id, folder_id, flags).await?,
        };

        info!(
            %user_id,
            %folder_id,
            can_read = flags.can_read,
            can_write = flags.can_write,
            can_delete = flags.can_delete,
            "Granted folder access"
        );
        Ok(permission)
    }

    /// Updates the flags of an existing grant; `NotFound` if no grant
    /// exists for the pair.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        folder_id: Uuid,
        flags: PermissionFlags,
    ) -> AppResult<Permission> {
        self.require_manager(ctx, folder_id).await?;

        let rows = self.permissions.update(user_id, folder_id, flags).await?;
        if rows == 0 {
            return Err(AppError::not_found("No grant exists for this user and folder"));
        }

        self.permissions
            .find_by_user_and_folder(user_id, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("No grant exists for this user and folder"))
    }

    /// Removes the grant for a pair. Returns whether a row was removed.
    pub async fn revoke(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        folder_id: Uuid,
    ) -> AppResult<bool> {
        self.require_manager(ctx, folder_id).await?;

        let removed = self.permissions.delete(user_id, folder_id).await?;
        if removed {
            info!(%user_id, %folder_id, "Revoked folder access");
        }
        Ok(removed)
    }

    /// Lists a user's grants. Admins may list anyone's; users only
    /// their own.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> AppResult<Vec<Permission>> {
        if !ctx.is_admin() && ctx.user_id != user_id {
            return Err(AppError::authorization(
                "Not allowed to list another user's grants",
            ));
        }
        self.permissions.find_by_user(user_id).await
    }

    /// Lists all grants on a folder. Admin or folder owner only.
    pub async fn list_for_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> AppResult<Vec<Permission>> {
        self.require_manager(ctx, folder_id).await?;
        self.permissions.find_by_folder(folder_id).await
    }

    /// Admins and the folder's owner may manage its grants.
    async fn require_manager(&self, ctx: &RequestContext, folder_id: Uuid) -> AppResult<()> {
        if ctx.is_admin() {
            return Ok(());
        }

        let owns = self
            .folders
            .find_by_id(folder_id)
            .await?
            .map(|f| f.owner_id == ctx.user_id)
            .unwrap_or(false);

        if owns {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Only admins or the folder owner may manage grants",
            ))
        }
    }
}
