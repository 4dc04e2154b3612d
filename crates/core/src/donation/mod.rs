//! The 3% donation calculation.
//!
//! Every euro to eusko exchange gives 3% of its amount to an association
//! chosen by the exchanging member.
//!
//! # Modules
//!
//! - `types` - Window and report types
//! - `allocation` - Attribution rules and running totals
//! - `service` - The allocator, reading the ledger and the directory

pub mod allocation;
pub mod service;
pub mod types;

#[cfg(test)]
mod allocation_props;

pub use allocation::{Allocation, DONATION_RATE};
pub use service::DonationAllocator;
pub use types::{AssociationDonation, AssociationRef, DonationPeriod, DonationReport, Exchange};
