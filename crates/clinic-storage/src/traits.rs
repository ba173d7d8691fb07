//! Storage traits for the clinic storage abstraction layer.
//!
//! This module defines the contract that all storage backends must implement.

use async_trait::async_trait;
use uuid::Uuid;

use clinic_core::{NewPatient, NewUser, Patient, PatientPatch, User, verify_password};

use crate::error::StorageError;

/// The storage trait that all clinic record backends must implement.
///
/// Inputs arrive already validated (see `clinic_core::validation`). Unknown
/// ids are a normal outcome: lookups return `None`, deletes return `false`.
/// `Err` is reserved for conflicts and backend failures. Implementations
/// must be thread-safe (`Send + Sync`) and serialize mutations so that
/// concurrent creates never share an id.
///
/// # Example
///
/// ```ignore
/// use clinic_storage::{ClinicStorage, StorageError};
///
/// async fn discharge(storage: &dyn ClinicStorage, id: Uuid) -> Result<bool, StorageError> {
///     storage.delete_patient(id).await
/// }
/// ```
#[async_trait]
pub trait ClinicStorage: Send + Sync {
    // ==================== Users ====================

    /// Reads a user by id.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    /// Reads a user by exact username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    /// Creates a user with a fresh id and a hashed password.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the username is taken.
    async fn create_user(&self, input: NewUser) -> Result<User, StorageError>;

    /// Looks up `username` and checks `password` against its stored hash.
    ///
    /// Returns `None` for an unknown username or a wrong password.
    async fn verify_user_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StorageError> {
        let Some(user) = self.get_user_by_username(username).await? else {
            return Ok(None);
        };
        let verified = verify_password(password, &user.password_hash)?;
        tracing::debug!(username, verified, "Password check");
        Ok(verified.then_some(user))
    }

    // ==================== Patients ====================

    /// Reads a patient by id.
    async fn get_patient(&self, id: Uuid) -> Result<Option<Patient>, StorageError>;

    /// Returns every patient in listing order
    /// (see [`crate::listing::compare_for_listing`]).
    async fn get_all_patients(&self) -> Result<Vec<Patient>, StorageError>;

    /// Stores a new patient under a fresh id and returns it.
    async fn create_patient(&self, input: NewPatient) -> Result<Patient, StorageError>;

    /// Merges `patch` into an existing patient.
    ///
    /// Returns `None` if no patient has this id; nothing is written then.
    async fn update_patient(
        &self,
        id: Uuid,
        patch: PatientPatch,
    ) -> Result<Option<Patient>, StorageError>;

    /// Removes a patient. Returns `true` if a record was removed.
    async fn delete_patient(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Case-insensitive substring search over name, contact number and
    /// disease/symptoms, in storage order. An empty query matches everything.
    async fn search_patients(&self, query: &str) -> Result<Vec<Patient>, StorageError>;

    /// Number of stored patients.
    async fn count_patients(&self) -> Result<usize, StorageError>;

    // ==================== Metadata ====================

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
