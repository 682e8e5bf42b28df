//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::PermissionAction;

/// A permission grant for one user on one folder.
///
/// At most one row exists per (user, folder) pair; re-granting updates
/// the row in place. A grant applies to that folder only — it is never
/// inherited by descendants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Unique permission identifier.
    pub id: Uuid,
    /// Subject user.
    pub user_id: Uuid,
    /// Target folder.
    pub folder_id: Uuid,
    /// Whether the user may read folder contents.
    pub can_read: bool,
    /// Whether the user may write into the folder.
    pub can_write: bool,
    /// Whether the user may delete folder contents.
    pub can_delete: bool,
    /// When this grant was created.
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Check whether this grant allows the given action.
    pub fn allows(&self, action: PermissionAction) -> bool {
        match action {
            PermissionAction::Read => self.can_read,
            PermissionAction::Write => self.can_write,
            PermissionAction::Delete => self.can_delete,
        }
    }
}

/// The three capability flags of a grant, as a value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PermissionFlags {
    /// Read capability.
    pub can_read: bool,
    /// Write capability.
    pub can_write: bool,
    /// Delete capability.
    pub can_delete: bool,
}

impl Default for PermissionFlags {
    /// Grants default to read-only.
    fn default() -> Self {
        Self {
            can_read: true,
            can_write: false,
            can_delete: false,
        }
    }
}
