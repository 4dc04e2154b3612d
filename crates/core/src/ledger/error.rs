//! Ledger client error type.

use thiserror::Error;

/// Failure of a single ledger call.
///
/// Transport errors, authentication errors and business rejections all
/// surface as this one type. The call name identifies the remote method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Ledger call {call} failed: {message}")]
pub struct LedgerError {
    /// Remote method, e.g. `payment/perform`.
    pub call: String,
    /// Error detail.
    pub message: String,
}

impl LedgerError {
    /// Creates an error for a remote method.
    #[must_use]
    pub fn new(call: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        503
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "LEDGER_UNAVAILABLE"
    }
}
