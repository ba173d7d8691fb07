//! Queries against the `users` table. The `password` column holds the
//! Argon2 hash, never the plaintext.

use clinic_core::User;
use clinic_storage::StorageError;
use sqlx_core::query::query;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::error::{is_unique_violation, query_failed};

fn user_from_row(row: &PgRow) -> Result<User, StorageError> {
    let decode = |e: sqlx_core::error::Error| query_failed("Failed to decode user row", e);
    Ok(User {
        id: row.try_get("id").map_err(decode)?,
        username: row.try_get("username").map_err(decode)?,
        password_hash: row.try_get("password").map_err(decode)?,
    })
}

/// Reads a user by id.
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<User>, StorageError> {
    let row = query("SELECT id, username, password FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| query_failed("Failed to read user", e))?;

    row.as_ref().map(user_from_row).transpose()
}

/// Reads a user by exact username.
pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, StorageError> {
    let row = query("SELECT id, username, password FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| query_failed("Failed to read user", e))?;

    row.as_ref().map(user_from_row).transpose()
}

/// Inserts a user with an already hashed password.
///
/// A taken username surfaces as `StorageError::AlreadyExists`.
pub async fn insert(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<User, StorageError> {
    let row = query(
        "INSERT INTO users (username, password) VALUES ($1, $2) \
         RETURNING id, username, password",
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StorageError::already_exists("User", username)
        } else {
            query_failed("Failed to create user", e)
        }
    })?;

    user_from_row(&row)
}
