//! Core business logic for the eusko backend.
//!
//! This crate contains pure business logic with ZERO web or HTTP client
//! dependencies. The ledger and the member directory are reached through
//! the `LedgerClient` and `MemberDirectory` traits.
//!
//! # Modules
//!
//! - `catalog` - Provisioned ledger identifiers
//! - `ledger` - Ledger client contract, postings and transfer fees
//! - `workflow` - Status flows and transition planning
//! - `directory` - Member directory contract
//! - `operation` - Operation reports and partial failures
//! - `orchestrator` - Desk and member operations
//! - `reconciliation` - Pending screens and batch reconciliation
//! - `donation` - The 3% donation calculation

pub mod catalog;
pub mod directory;
pub mod donation;
pub mod ledger;
pub mod operation;
pub mod orchestrator;
pub mod reconciliation;
pub mod workflow;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
