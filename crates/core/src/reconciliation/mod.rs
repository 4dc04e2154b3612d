//! Reconciliation of vault, desk and bank movements.
//!
//! # Modules
//!
//! - `types` - Pending screens and batch requests
//! - `balancing` - Netting two totals into one transfer
//! - `service` - The reconciliation engine

pub mod balancing;
pub mod service;
pub mod types;

#[cfg(test)]
mod balancing_props;

pub use balancing::{BalanceDirection, BalancingTransfer, net_balance};
pub use service::ReconciliationEngine;
pub use types::{
    BankDeposit, BankTransfers, CashDeposit, DepositBreakdown, PendingScreen, ReturnEuskoOut,
    Selection, StockIn,
};
