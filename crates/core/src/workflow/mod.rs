//! Status flow management for ledger postings.
//!
//! This module models the ledger's transfer status flows and validates
//! every status change before it is submitted.
//!
//! # Modules
//!
//! - `types` - Flow graph and transition types
//! - `error` - Workflow-specific error types
//! - `service` - Transition planning

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{FlowKind, StatusEdge, StatusFlow, StatusTransition};
