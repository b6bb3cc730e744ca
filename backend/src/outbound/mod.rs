//! Outbound adapters implementing the domain ports.

pub mod mail;
pub mod persistence;
