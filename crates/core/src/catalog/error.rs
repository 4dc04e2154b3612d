//! Catalog loading errors.

use thiserror::Error;

/// Errors raised while loading the provisioned catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read or parsed.
    #[error("Failed to load catalog: {0}")]
    Load(#[from] config::ConfigError),

    /// The catalog is inconsistent.
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}
