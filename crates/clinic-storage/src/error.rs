//! Storage error types for the clinic storage abstraction layer.
//!
//! A missing record is not an error: lookups return `Option` and deletes
//! return `bool`. The variants here cover conflicts and backend failures.

use std::fmt;

use clinic_core::CoreError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A record with the same unique key already exists.
    #[error("{record_type} already exists: {key}")]
    AlreadyExists {
        /// The kind of record (`User`, `Patient`).
        record_type: String,
        /// The conflicting key value.
        key: String,
    },

    /// Stored or supplied data could not be turned into a record.
    #[error("Invalid record: {message}")]
    InvalidRecord {
        /// Description of why the record is invalid.
        message: String,
    },

    /// Failed to connect to the storage backend.
    #[error("Connection error: {message}")]
    ConnectionError {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `AlreadyExists` error.
    #[must_use]
    pub fn already_exists(record_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            record_type: record_type.into(),
            key: key.into(),
        }
    }

    /// Creates a new `InvalidRecord` error.
    #[must_use]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// Creates a new `ConnectionError` error.
    #[must_use]
    pub fn connection_error(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an already exists error.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::InvalidRecord { .. } => ErrorCategory::Validation,
            Self::ConnectionError { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        if err.is_client_error() {
            Self::invalid_record(err.to_string())
        } else {
            Self::internal(err.to_string())
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unique key conflict.
    Conflict,
    /// Malformed record data.
    Validation,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
