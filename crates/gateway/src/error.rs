//! Transport-level errors, before they are mapped to core errors.

use reqwest::StatusCode;
use thiserror::Error;

use eusko_core::directory::DirectoryError;
use eusko_core::ledger::LedgerError;

/// Failure of one HTTP round trip.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, timeout or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote system answered with an error status.
    #[error("{status}: {detail}")]
    Rejected {
        /// Response status.
        status: StatusCode,
        /// Remote error code when the body carries one, else the raw body.
        detail: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The client could not be built.
    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl GatewayError {
    /// Maps to the ledger's uniform failure.
    #[must_use]
    pub fn into_ledger(self, call: &str) -> LedgerError {
        LedgerError::new(call, self.to_string())
    }

    /// Maps to the directory's failure.
    #[must_use]
    pub fn into_directory(self, call: &str) -> DirectoryError {
        DirectoryError::new(call, self.to_string())
    }
}
