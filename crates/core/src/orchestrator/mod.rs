//! Transaction orchestrator.
//!
//! Turns a business intent (an exchange, a deposit, a subscription...) into
//! the ordered postings the ledger needs.
//!
//! # Modules
//!
//! - `types` - Operation requests
//! - `notify` - Subscription notification seam
//! - `service` - The orchestrator

pub mod notify;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use notify::SubscriptionNotifier;
pub use service::{DESK_LOGIN_SUFFIX, EUSKAL_MONETA_LOGIN, TransactionOrchestrator};
pub use types::{
    BankTransferExchange, DigitalExchange, DigitalSubscription, NotesMovement, NotesTransport,
    PaperExchange, PaperReconversion, SubscriptionPayment,
};
