//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod generations;
pub mod health;
pub mod schemas;
pub mod session;
pub mod state;
pub mod upload;

pub use error::{ApiError, ApiResult};
