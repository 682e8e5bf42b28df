//! Storage configuration.

use serde::{Deserialize, Serialize};

/// Upload-root storage configuration.
///
/// The upload root is the directory tree that mirrors the logical folder
/// hierarchy 1:1; every folder row has a physical directory beneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all uploaded files and mirrored folders.
    #[serde(default = "default_upload_root")]
    pub upload_root: String,
    /// Maximum upload size in bytes (default 100 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_root: default_upload_root(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_upload_root() -> String {
    "./uploads".to_string()
}

fn default_max_upload() -> u64 {
    100 * 1024 * 1024
}
