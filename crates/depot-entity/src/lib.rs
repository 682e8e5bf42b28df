//! # depot-entity
//!
//! Typed entity records for the Depot data model: users, folders, files,
//! and folder permissions. One canonical snake_case field naming is used
//! internally; alternate external naming is a serialization-layer concern.

pub mod file;
pub mod folder;
pub mod permission;
pub mod user;
