//! Domain-specific error types for the verification lifecycle.
//!
//! All failures are structured values; nothing in the lifecycle panics in
//! non-test code. Each error kind carries a stable code used by the
//! presentation layer when building API responses.

use thiserror::Error;

/// Errors reported by a record store implementation
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Uniqueness constraint violated: {message}")]
    ConstraintViolation { message: String },

    #[error("Transient storage error: {message}")]
    Transient { message: String },
}

impl StoreError {
    /// Build a transient error from any displayable source
    pub fn transient(source: impl std::fmt::Display) -> Self {
        Self::Transient {
            message: source.to_string(),
        }
    }
}

/// Errors reported by a delivery notifier implementation
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Delivery failed, retry possible: {message}")]
    Transient { message: String },

    #[error("Delivery rejected permanently: {message}")]
    Permanent { message: String },
}

/// Errors surfaced by the credential lifecycle manager
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Invalid email address")]
    InvalidIdentity,

    #[error("No verification request found")]
    NotFound,

    #[error("Verification credential expired")]
    Expired,

    #[error("Too many attempts, request a new credential")]
    LockedOut,

    #[error("Invalid verification credential")]
    InvalidCredential { remaining_attempts: u32 },

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("Transient error: {message}")]
    Transient { message: String },
}

impl VerificationError {
    /// Build a transient error from any displayable source
    pub fn transient(source: impl std::fmt::Display) -> Self {
        Self::Transient {
            message: source.to_string(),
        }
    }

    /// Stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::InvalidIdentity => "INVALID_IDENTITY",
            VerificationError::NotFound => "NOT_FOUND",
            VerificationError::Expired => "CREDENTIAL_EXPIRED",
            VerificationError::LockedOut => "LOCKED_OUT",
            VerificationError::InvalidCredential { .. } => "INVALID_CREDENTIAL",
            VerificationError::Delivery(DeliveryError::Transient { .. }) => "DELIVERY_FAILED",
            VerificationError::Delivery(DeliveryError::Permanent { .. }) => "DELIVERY_REJECTED",
            VerificationError::Transient { .. } => "TRANSIENT_ERROR",
        }
    }
}

impl From<StoreError> for VerificationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => VerificationError::NotFound,
            // constraint conflicts surface as retryable infrastructure noise
            // once the manager's own retry is exhausted
            StoreError::ConstraintViolation { message } => {
                VerificationError::Transient { message }
            }
            StoreError::Transient { message } => VerificationError::Transient { message },
        }
    }
}

/// Result alias for lifecycle operations
pub type VerificationResult<T> = Result<T, VerificationError>;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            VerificationError::InvalidIdentity.error_code(),
            "INVALID_IDENTITY"
        );
        assert_eq!(VerificationError::NotFound.error_code(), "NOT_FOUND");
        assert_eq!(VerificationError::Expired.error_code(), "CREDENTIAL_EXPIRED");
        assert_eq!(VerificationError::LockedOut.error_code(), "LOCKED_OUT");
        assert_eq!(
            VerificationError::InvalidCredential {
                remaining_attempts: 2
            }
            .error_code(),
            "INVALID_CREDENTIAL"
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let err: VerificationError = StoreError::NotFound.into();
        assert!(matches!(err, VerificationError::NotFound));

        let err: VerificationError = StoreError::ConstraintViolation {
            message: "duplicate identity".to_string(),
        }
        .into();
        assert!(matches!(err, VerificationError::Transient { .. }));
    }

    #[test]
    fn test_delivery_error_conversion() {
        let err: VerificationError = DeliveryError::Permanent {
            message: "mailbox rejected".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "DELIVERY_REJECTED");
    }
}
