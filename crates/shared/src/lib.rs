//! Shared types, errors, and configuration for the eusko backend.
//!
//! This crate provides common types used across all other crates:
//! - Amounts and currencies with decimal precision
//! - Typed identifiers for ledger entities
//! - Application-wide error types
//! - Configuration management
//! - Email notifications

pub mod config;
pub mod email;
pub mod error;
pub mod types;

pub use config::{AppConfig, CyclosConfig, DolibarrConfig, DonationConfig, EmailConfig};
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
