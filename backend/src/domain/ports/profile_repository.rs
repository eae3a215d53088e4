//! Port abstraction for profile persistence and credit settlement.

use async_trait::async_trait;

use crate::domain::{Profile, UserId};

/// Persistence errors raised by profile repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileRepositoryError {
    /// Repository connection could not be established.
    #[error("profile repository connection failed: {message}")]
    Connection {
        /// Connection failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("profile repository query failed: {message}")]
    Query {
        /// Query failure description.
        message: String,
    },
}

impl ProfileRepositoryError {
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

/// Result of a conditional credit debit.
///
/// The debit is a single atomic `decrement where balance >= cost` so the
/// balance can never go negative, even when concurrent uploads race past the
/// pre-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The balance covered the cost and was decremented.
    Applied {
        /// Balance remaining after the debit.
        remaining: i64,
    },
    /// The balance no longer covered the cost; nothing was changed.
    InsufficientCredits {
        /// Balance observed when the debit was refused.
        available: i64,
    },
}

/// Profile reads and the atomic credit debit.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile by identity. `Ok(None)` means the row was never
    /// provisioned, which callers treat as a zero balance.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Atomically decrement the balance by `amount` if it covers it.
    async fn debit(
        &self,
        user_id: &UserId,
        amount: u32,
    ) -> Result<DebitOutcome, ProfileRepositoryError>;
}
