//! Member directory gateway.

pub mod client;
mod wire;

pub use client::DolibarrClient;
