//! Trait seams shared across Depot crates.

pub mod storage;

pub use storage::BlobStore;
