//! File operations.

pub mod batch;
pub mod service;

pub use batch::{BatchItemError, BatchOutcome};
pub use service::FileService;
