//! Blob-store trait for the physical upload-root directory tree.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the physical storage backend beneath the upload root.
///
/// Paths are always relative to the upload root and use `/` separators;
/// folder directories mirror the logical folder hierarchy 1:1. The trait
/// is defined here in `depot-core` and implemented in `depot-storage`;
/// tests wrap implementations to count or inject physical faults.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Read a file into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to a file at the given path, creating parent
    /// directories as needed.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Copy a file from one path to another.
    async fn copy(&self, from: &str, to: &str) -> AppResult<()>;

    /// Remove a file. Removing an absent file is not an error.
    async fn remove(&self, path: &str) -> AppResult<()>;

    /// Create a directory (and any missing parents).
    async fn create_dir(&self, path: &str) -> AppResult<()>;

    /// Remove a directory and all its contents recursively.
    async fn remove_dir(&self, path: &str) -> AppResult<()>;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;
}
