//! Ledger client contract and ledger domain types.
//!
//! # Modules
//!
//! - `types` - Payments, postings, history queries and account summaries
//! - `client` - The `LedgerClient` trait and the paginated history search
//! - `fee` - Transfer fees the ledger generates by itself
//! - `error` - The uniform ledger failure

pub mod client;
pub mod error;
pub mod fee;
pub mod types;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod fee_props;

pub use client::{LedgerClient, MAX_PAGE_SIZE, search_history};
pub use error::LedgerError;
pub use fee::{ChargeMode, CounterLeg, FeeParty, FeeRule, GeneratedTransfer};
pub use types::{
    AccountOwner, AccountSummary, CustomValue, Direction, EntityRef, FieldValue, HistoryPage,
    HistoryQuery, LedgerUser, Nature, PaymentRequest, Period, Posting, RecordedField,
    RecordedValue, TransactionRecord,
};
