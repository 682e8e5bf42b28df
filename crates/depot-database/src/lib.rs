//! # depot-database
//!
//! SQLite connection management, schema creation, and concrete repository
//! implementations for all Depot entities.

pub mod connection;
pub mod repositories;
pub mod schema;

pub use connection::DatabasePool;
