//! Persistence layer — libSQL-backed settings storage for handed-off
//! onboarding profiles.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::Database;
