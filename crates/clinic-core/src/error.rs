use thiserror::Error;

use crate::validation::ValidationError;

/// Core error types for clinic record operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid record id: {0}")]
    InvalidId(String),

    #[error("Invalid date: {0}")]
    InvalidDateTime(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl CoreError {
    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a new InvalidDateTime error
    pub fn invalid_date_time(value: impl Into<String>) -> Self {
        Self::InvalidDateTime(value.into())
    }

    /// Create a new PasswordHash error
    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash(message.into())
    }

    /// Check if this error was caused by caller input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidId(_) | Self::InvalidDateTime(_))
    }

    /// Get error category for logging/monitoring
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) | Self::InvalidId(_) | Self::InvalidDateTime(_) => {
                ErrorCategory::Validation
            }
            Self::PasswordHash(_) => ErrorCategory::System,
        }
    }
}

/// Error categories for monitoring and classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    System,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::System => write!(f, "system"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldViolation;

    #[test]
    fn test_invalid_id_error() {
        let err = CoreError::invalid_id("not-a-uuid");
        assert_eq!(err.to_string(), "Invalid record id: not-a-uuid");
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let validation = ValidationError::new(vec![FieldViolation::new(
            "age",
            "Age must be greater than 0",
        )]);
        let err = CoreError::from(validation);
        assert_eq!(
            err.to_string(),
            "Validation failed: age: Age must be greater than 0"
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_password_hash_is_server_side() {
        let err = CoreError::password_hash("salt");
        assert!(!err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.category().to_string(), "system");
    }
}
