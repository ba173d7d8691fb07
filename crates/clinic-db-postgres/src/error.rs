//! Error types for the PostgreSQL storage backend.

use clinic_storage::StorageError;
use sqlx_core::error::Error as SqlxError;

/// PostgreSQL error code for unique constraint violation (23505).
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// Checks if a sqlx error has a specific PostgreSQL error code.
pub fn has_pg_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Checks if a sqlx error is a unique constraint violation (23505).
pub fn is_unique_violation(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_UNIQUE_VIOLATION)
}

/// Errors specific to the PostgreSQL storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] SqlxError),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => StorageError::connection_error(e.to_string()),
            PostgresError::Migration(e) => StorageError::internal(format!("Migration error: {e}")),
            PostgresError::Config { message } => {
                StorageError::internal(format!("Configuration error: {message}"))
            }
        }
    }
}

/// Maps a failed query to a storage error.
///
/// Pool and I/O failures become `ConnectionError`; everything else is
/// `Internal`, prefixed with `context`.
pub(crate) fn query_failed(context: &str, err: SqlxError) -> StorageError {
    match err {
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed => StorageError::connection_error(format!("{context}: {err}")),
        other => StorageError::internal(format!("{context}: {other}")),
    }
}

/// Result type alias for PostgreSQL operations.
pub type Result<T> = std::result::Result<T, PostgresError>;
