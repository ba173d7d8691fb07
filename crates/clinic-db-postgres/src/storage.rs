//! PostgreSQL implementation of the `ClinicStorage` trait.

use async_trait::async_trait;
use sqlx_postgres::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use clinic_core::{NewPatient, NewUser, Patient, PatientPatch, User, hash_password};
use clinic_storage::{ClinicStorage, StorageError, sort_for_listing};

use crate::config::PostgresConfig;
use crate::migrations;
use crate::pool;
use crate::queries::{patients, users};

/// PostgreSQL storage backend for clinic records.
///
/// Row locks serialize concurrent updates of one patient; the database
/// assigns ids, so concurrent creates never collide.
#[derive(Debug, Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Creates a new `PostgresStorage` with the given configuration.
    ///
    /// This will:
    /// 1. Create a connection pool
    /// 2. Run migrations (if configured)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection pool cannot be created
    /// or if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(&config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresStorage` from an existing connection pool.
    ///
    /// Migrations are not run automatically when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ClinicStorage for PostgresStorage {
    #[instrument(skip(self))]
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        users::get(&self.pool, id).await
    }

    #[instrument(skip(self))]
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        users::get_by_username(&self.pool, username).await
    }

    #[instrument(skip_all, fields(username = %input.username))]
    async fn create_user(&self, input: NewUser) -> Result<User, StorageError> {
        let password_hash = hash_password(&input.password)?;
        let user = users::insert(&self.pool, &input.username, &password_hash).await?;
        debug!(user.id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>, StorageError> {
        patients::get(&self.pool, id).await
    }

    #[instrument(skip(self))]
    async fn get_all_patients(&self) -> Result<Vec<Patient>, StorageError> {
        // Rows arrive in insertion order, so ties break as in memory.
        let rows = patients::list(&self.pool).await?;
        Ok(sort_for_listing(rows))
    }

    #[instrument(skip_all)]
    async fn create_patient(&self, input: NewPatient) -> Result<Patient, StorageError> {
        let patient = patients::insert(&self.pool, &input).await?;
        debug!(patient.id = %patient.id, "Patient created");
        Ok(patient)
    }

    #[instrument(skip(self, patch))]
    async fn update_patient(
        &self,
        id: Uuid,
        patch: PatientPatch,
    ) -> Result<Option<Patient>, StorageError> {
        let updated = patients::update(&self.pool, id, patch).await?;
        if updated.is_some() {
            debug!(patient.id = %id, "Patient updated");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_patient(&self, id: Uuid) -> Result<bool, StorageError> {
        let removed = patients::delete(&self.pool, id).await?;
        if removed {
            debug!(patient.id = %id, "Patient deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn search_patients(&self, query: &str) -> Result<Vec<Patient>, StorageError> {
        patients::search(&self.pool, query).await
    }

    async fn count_patients(&self) -> Result<usize, StorageError> {
        patients::count(&self.pool).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
