//! SQL query implementations for the PostgreSQL storage backend.
//!
//! One module per table. Queries are built at runtime with sqlx-core, so no
//! database is needed at compile time.

pub mod patients;
pub mod users;
