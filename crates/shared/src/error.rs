//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// An account does not hold enough money for the operation.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// A ledger or directory call failed before anything was submitted.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Some ledger calls were committed before a later one failed.
    #[error("Partially applied: {0}")]
    PartiallyApplied(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) | Self::InsufficientFunds(_) => 422,
            Self::PartiallyApplied(_) => 502,
            Self::ServiceUnavailable(_) => 503,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::PartiallyApplied(_) => "PARTIALLY_APPLIED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::BusinessRule(String::new()).status_code(), 422);
        assert_eq!(AppError::InsufficientFunds(String::new()).status_code(), 422);
        assert_eq!(AppError::PartiallyApplied(String::new()).status_code(), 502);
        assert_eq!(AppError::ServiceUnavailable(String::new()).status_code(), 503);
        assert_eq!(AppError::Configuration(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "FORBIDDEN");
        assert_eq!(
            AppError::InsufficientFunds(String::new()).error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            AppError::ServiceUnavailable(String::new()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            AppError::PartiallyApplied(String::new()).error_code(),
            "PARTIALLY_APPLIED"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::ServiceUnavailable("cyclos".into()).to_string(),
            "Service unavailable: cyclos"
        );
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
    }
}
