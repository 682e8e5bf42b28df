//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in the file hierarchy.
///
/// Every folder row has a physical directory at `upload_root/path`;
/// the two are created and deleted together.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Display name (trimmed).
    pub name: String,
    /// Canonical path, globally unique (e.g. `documents/reports`).
    /// Root-level folders use the bare name with no separator.
    pub path: String,
    /// Parent folder ID (None for root-level folders).
    pub parent_id: Option<Uuid>,
    /// The folder owner.
    pub owner_id: Uuid,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name (already trimmed).
    pub name: String,
    /// Canonical path.
    pub path: String,
    /// Parent folder (None for root-level).
    pub parent_id: Option<Uuid>,
    /// The folder owner.
    pub owner_id: Uuid,
}
