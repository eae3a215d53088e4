//! Port abstraction for the append-only generation history.

use async_trait::async_trait;

use crate::domain::{GenerationRecord, UserId};

/// Persistence errors raised by generation log adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationLogError {
    /// Repository connection could not be established.
    #[error("generation log connection failed: {message}")]
    Connection {
        /// Connection failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("generation log query failed: {message}")]
    Query {
        /// Query failure description.
        message: String,
    },
}

impl GenerationLogError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Append-only history of successful generations.
#[async_trait]
pub trait GenerationLog: Send + Sync {
    /// Append one record. Records are never updated or deleted.
    async fn append(&self, record: &GenerationRecord) -> Result<(), GenerationLogError>;

    /// List a caller's records, newest first, capped at `limit`.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<GenerationRecord>, GenerationLogError>;
}
