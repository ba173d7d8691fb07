//! # clinic-storage
//!
//! Storage abstraction layer for clinic records.
//!
//! This crate defines the trait that all storage backends implement and the
//! listing/search rules they share. It contains no backend itself: see
//! `clinic-db-memory` and `clinic-db-postgres`.
//!
//! ## Example
//!
//! ```ignore
//! use clinic_storage::{DynStorage, StorageError};
//!
//! async fn find(storage: &DynStorage, query: &str) -> Result<usize, StorageError> {
//!     Ok(storage.search_patients(query).await?.len())
//! }
//! ```

mod error;
pub mod listing;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use listing::{compare_for_listing, filter_by_query, sort_for_listing};
pub use traits::ClinicStorage;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn ClinicStorage>;
