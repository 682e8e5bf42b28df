//! Folder permission entity.

pub mod action;
pub mod model;

pub use action::PermissionAction;
pub use model::{Permission, PermissionFlags};
