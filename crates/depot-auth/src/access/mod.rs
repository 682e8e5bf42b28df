//! Folder access evaluation.

pub mod checker;

pub use checker::AccessChecker;
