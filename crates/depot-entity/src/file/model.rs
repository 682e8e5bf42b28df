//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file stored in Depot.
///
/// `storage_name` is the collision-resistant on-disk filename;
/// `original_name` is what the user sees. The physical blob lives at
/// `upload_root/storage_path`. Note that `move` updates only `folder_id`,
/// so a moved file's `storage_path` may diverge from its folder's
/// canonical path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// Internal storage filename (unique suffix + original extension).
    pub storage_name: String,
    /// Original display name as uploaded.
    pub original_name: String,
    /// Relative path of the physical blob beneath the upload root; unique.
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type of the file, if known.
    pub mime_type: Option<String>,
    /// The folder containing this file (None = root).
    pub folder_id: Option<Uuid>,
    /// The file owner.
    pub owner_id: Uuid,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
}

impl File {
    /// Get the original name's extension including the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        let idx = self.original_name.rfind('.')?;
        if idx == 0 {
            return None;
        }
        Some(&self.original_name[idx..])
    }
}

/// Data required to create a new file row.
///
/// The physical blob must already exist at `storage_path` when the row
/// is inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// Internal storage filename.
    pub storage_name: String,
    /// Original display name.
    pub original_name: String,
    /// Relative blob path beneath the upload root.
    pub storage_path: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// MIME type.
    pub mime_type: Option<String>,
    /// The folder to place the file in (None = root).
    pub folder_id: Option<Uuid>,
    /// The file owner.
    pub owner_id: Uuid,
}
