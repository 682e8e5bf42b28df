//! Repository implementations.
//!
//! Repositories are pure row CRUD over the connection pool. Lookups
//! return `Option` — absence is a normal outcome, not a fault; callers
//! decide whether a missing row is an error.

pub mod file;
pub mod folder;
pub mod permission;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use permission::PermissionRepository;
pub use user::UserRepository;
