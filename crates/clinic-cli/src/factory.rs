//! Builds the configured storage backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use clinic_db_postgres::{PostgresConfig, PostgresStorage, create_pool, migrations};
use clinic_storage::DynStorage;
use tracing::info;

use crate::config::{StorageBackend, StorageSettings};

fn postgres_config(settings: &StorageSettings) -> Result<PostgresConfig> {
    settings
        .postgres
        .clone()
        .context("storage.postgres is not configured")
}

/// Creates the backend selected by `settings.backend`.
pub async fn create_storage(settings: &StorageSettings) -> Result<DynStorage> {
    let storage: DynStorage = match settings.backend {
        StorageBackend::Memory => clinic_db_memory::create_storage(),
        StorageBackend::Postgres => {
            let config = postgres_config(settings)?;
            let storage = PostgresStorage::new(config)
                .await
                .context("Failed to open PostgreSQL storage")?;
            Arc::new(storage)
        }
    };
    info!(backend = storage.backend_name(), "Storage ready");
    Ok(storage)
}

/// Applies pending PostgreSQL migrations.
pub async fn run_migrations(settings: &StorageSettings) -> Result<()> {
    if settings.backend != StorageBackend::Postgres {
        anyhow::bail!("migrations apply to the postgres backend; use --backend postgres");
    }
    let config = postgres_config(settings)?;
    let pool = create_pool(&config)
        .await
        .context("Failed to connect to PostgreSQL")?;
    migrations::run(&pool).await.context("Migration failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let settings = StorageSettings::default();
        let storage = tokio_test::block_on(create_storage(&settings)).unwrap();
        assert_eq!(storage.backend_name(), "memory");
    }

    #[test]
    fn test_postgres_backend_without_settings() {
        let settings = StorageSettings {
            backend: StorageBackend::Postgres,
            postgres: None,
        };
        let err = tokio_test::block_on(create_storage(&settings)).err().unwrap();
        assert!(err.to_string().contains("storage.postgres"));
    }

    #[test]
    fn test_migrate_requires_postgres() {
        let err = tokio_test::block_on(run_migrations(&StorageSettings::default())).unwrap_err();
        assert!(err.to_string().contains("postgres"));
    }
}
