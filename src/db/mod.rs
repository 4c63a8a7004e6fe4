//! SQLite storage
//!
//! Connection pool and schema for meal logs and analysis counters.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
pub use migrations::{get_schema_version, run_migrations};
