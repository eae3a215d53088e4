//! Outbound adapters implementing the domain ports.

pub mod auth;
pub mod persistence;
pub mod storage;
pub mod upstream;
