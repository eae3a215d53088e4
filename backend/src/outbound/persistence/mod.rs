//! PostgreSQL persistence adapters.

mod diesel_generation_log;
mod diesel_profile_repository;
mod models;
pub mod pool;
pub mod schema;

pub use diesel_generation_log::DieselGenerationLog;
pub use diesel_profile_repository::DieselProfileRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
