//! Actix middleware.

pub mod trace;

pub use trace::{Trace, TraceId};
