//! Operation error types.

use thiserror::Error;

use eusko_shared::AppError;
use eusko_shared::types::AmountError;

use crate::directory::DirectoryError;
use crate::ledger::LedgerError;
use crate::operation::report::PartialFailure;
use crate::workflow::WorkflowError;

/// Why an operation did not complete.
///
/// Every variant except `Partial` guarantees that nothing was submitted
/// to the ledger.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Malformed input: amount, missing field, unknown payment mode.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A member, desk or bank could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation is not allowed for this member.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An account does not hold enough money.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// A selected posting cannot move to the requested status.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The ledger failed before anything was committed.
    #[error("Ledger unavailable: {0}")]
    Ledger(#[from] LedgerError),

    /// The member directory failed before anything was committed.
    #[error("Member directory unavailable: {0}")]
    Directory(#[from] DirectoryError),

    /// Some ledger calls were committed before a later one failed.
    #[error("{0}")]
    Partial(Box<PartialFailure>),
}

impl OperationError {
    /// Returns true if no ledger call was committed.
    #[must_use]
    pub const fn nothing_happened(&self) -> bool {
        !matches!(self, Self::Partial(_))
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Workflow(e) => e.status_code(),
            Self::InsufficientFunds(_) => 422,
            Self::Partial(_) => 502,
            Self::Ledger(_) | Self::Directory(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::Workflow(e) => e.error_code(),
            Self::Ledger(_) => "LEDGER_UNAVAILABLE",
            Self::Directory(_) => "DIRECTORY_UNAVAILABLE",
            Self::Partial(_) => "PARTIALLY_APPLIED",
        }
    }
}

impl From<AmountError> for OperationError {
    fn from(err: AmountError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        let message = err.to_string();
        match err {
            OperationError::Validation(_) => Self::Validation(message),
            OperationError::NotFound(_) => Self::NotFound(message),
            OperationError::Forbidden(_) => Self::Forbidden(message),
            OperationError::InsufficientFunds(_) => Self::InsufficientFunds(message),
            OperationError::Workflow(_) => Self::BusinessRule(message),
            OperationError::Ledger(_) | OperationError::Directory(_) => {
                Self::ServiceUnavailable(message)
            }
            OperationError::Partial(_) => Self::PartiallyApplied(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::report::FailedStep;
    use eusko_shared::types::PostingId;
    use uuid::Uuid;

    fn partial() -> OperationError {
        OperationError::Partial(Box::new(PartialFailure {
            operation_id: Uuid::nil(),
            operation: "exchange_digital_at_desk".to_string(),
            completed: vec![],
            failed: FailedStep {
                index: 2,
                description: "account_credit".to_string(),
                error: LedgerError::new("payment/perform", "timeout"),
            },
            not_transitioned: vec![PostingId::new("9")],
        }))
    }

    #[test]
    fn test_nothing_happened() {
        assert!(OperationError::Validation("x".into()).nothing_happened());
        assert!(OperationError::Ledger(LedgerError::new("user/search", "down")).nothing_happened());
        assert!(!partial().nothing_happened());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(OperationError::Validation(String::new()).status_code(), 400);
        assert_eq!(OperationError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(OperationError::NotFound(String::new()).status_code(), 404);
        assert_eq!(OperationError::InsufficientFunds(String::new()).status_code(), 422);
        assert_eq!(
            OperationError::Directory(DirectoryError::new("members", "down")).status_code(),
            503
        );
        assert_eq!(partial().status_code(), 502);
    }

    #[test]
    fn test_partial_display_names_failed_step() {
        let message = partial().to_string();
        assert!(message.contains("exchange_digital_at_desk stopped at step 2"));
        assert!(message.contains("account_credit"));
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = OperationError::InsufficientFunds("billets".into()).into();
        assert_eq!(app.error_code(), "INSUFFICIENT_FUNDS");
        let app: AppError = partial().into();
        assert_eq!(app.status_code(), 502);
    }

    #[test]
    fn test_amount_error_is_validation() {
        let err: OperationError = AmountError::Unparsable("abc".into()).into();
        assert!(matches!(err, OperationError::Validation(_)));
    }
}
