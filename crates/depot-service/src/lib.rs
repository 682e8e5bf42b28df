//! Business logic services for Depot.
//!
//! Services compose the repositories, the blob store, and the access
//! checker into the operations the outer layers call. Every mutating
//! operation goes through the access checker before touching rows or
//! blobs.

pub mod context;
pub mod file;
pub mod folder;
pub mod permission;
pub mod user;

pub use context::RequestContext;
pub use file::batch::{BatchItemError, BatchOutcome};
pub use file::FileService;
pub use folder::FolderService;
pub use permission::PermissionService;
pub use user::UserService;
