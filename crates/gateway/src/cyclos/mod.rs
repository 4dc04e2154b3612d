//! Ledger gateway.
//!
//! - `client` - `CyclosClient`, one method per web-rpc service
//! - `wire` - Request and response bodies of those services

pub mod client;
mod wire;

pub use client::CyclosClient;
