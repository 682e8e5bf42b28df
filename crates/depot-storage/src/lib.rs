//! Local filesystem blob storage for Depot.
//!
//! Stores uploaded blobs under a configurable root directory, with one
//! subdirectory per logical folder path. The database is the source of
//! truth for metadata; this crate only moves bytes.

pub mod local;
pub mod mime;

pub use local::LocalBlobStore;
pub use mime::mime_from_name;
