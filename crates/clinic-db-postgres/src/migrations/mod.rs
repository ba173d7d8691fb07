//! Database migration management for the PostgreSQL storage backend.
//!
//! Migrations are embedded in the binary, so the `clinic` executable can set
//! up a fresh database without access to the source tree.

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use sqlx_postgres::PgPool;
use std::borrow::Cow;
use tracing::{info, instrument};

use crate::error::{PostgresError, Result};

/// Embedded migrations in chronological order: `(version, description, sql)`.
///
/// To add a migration, create the SQL file under `migrations/` and append an
/// entry here.
macro_rules! embedded_migrations {
    () => {
        &[(
            20250101000001i64,
            "initial_schema",
            include_str!("../../migrations/20250101000001_initial_schema.sql"),
        )]
    };
}

fn build_migrations() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Runs all pending migrations. Applied versions are tracked in
/// `_sqlx_migrations`, so running twice is a no-op.
///
/// # Errors
///
/// Returns an error if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<()> {
    let migrations = build_migrations();
    info!(count = migrations.len(), "Running database migrations");

    let migrator = Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| PostgresError::Migration(format!("Migration failed: {e}")))?;

    info!("Database migrations completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let migrations = build_migrations();
        assert!(!migrations.is_empty());
        assert!(
            migrations
                .windows(2)
                .all(|pair| pair[0].version < pair[1].version)
        );
    }

    #[test]
    fn test_initial_schema_creates_tables() {
        let migrations = build_migrations();
        let sql = &migrations[0].sql;
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS patients"));
        assert!(sql.contains("fee numeric(10, 2)"));
    }
}
