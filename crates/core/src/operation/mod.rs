//! Multi-step ledger operations: errors, reports and submission tracking.
//!
//! The ledger offers no transaction spanning several calls. Operations
//! therefore validate everything locally first, then submit calls one by
//! one and stop at the first failure. Nothing is compensated.
//!
//! # Modules
//!
//! - `error` - `OperationError`, the error of every orchestrated operation
//! - `report` - Completed and partially applied operation reports
//! - `submission` - Step-by-step submission with logging

pub mod error;
pub mod report;
pub(crate) mod submission;

pub use error::OperationError;
pub use report::{CommittedStep, FailedStep, OperationReport, PartialFailure};
