//! HTTP clients for the systems the backend orchestrates.
//!
//! - `cyclos` - The double-entry ledger, implementing `LedgerClient`
//! - `dolibarr` - The member directory, implementing `MemberDirectory`
//!
//! Both clients are thin: one method per remote call, no retries, every
//! failure mapped to the core's uniform error type.

pub mod cyclos;
pub mod dolibarr;
pub mod error;

pub use cyclos::CyclosClient;
pub use dolibarr::DolibarrClient;
pub use error::GatewayError;
