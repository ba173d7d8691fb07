//! In-memory storage backend for clinic records.
//!
//! This crate provides an in-memory implementation of the `ClinicStorage`
//! trait from `clinic-storage`. Records live for the lifetime of the
//! instance; a new instance always starts empty.
//!
//! # Example
//!
//! ```ignore
//! use clinic_core::{Gender, NewPatient};
//! use clinic_db_memory::InMemoryStorage;
//! use clinic_storage::ClinicStorage;
//!
//! let storage = InMemoryStorage::new();
//! let created = storage
//!     .create_patient(NewPatient::new("John Smith", 42, Gender::Male, "Cough"))
//!     .await?;
//! ```

pub mod storage;

// Re-export the ClinicStorage trait for convenience
pub use clinic_storage::{ClinicStorage, DynStorage, StorageError};

pub use storage::InMemoryStorage;

/// Creates a new, empty in-memory storage behind a shared handle.
pub fn create_storage() -> DynStorage {
    std::sync::Arc::new(InMemoryStorage::new())
}
