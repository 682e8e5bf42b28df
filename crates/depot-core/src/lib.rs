//! # depot-core
//!
//! Core crate for Depot. Contains the unified error system, configuration
//! schemas, and the blob-store trait seam used by the service layer.
//!
//! This crate has **no** internal dependencies on other Depot crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
