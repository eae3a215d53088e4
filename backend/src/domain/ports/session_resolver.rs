//! Port abstraction for resolving session tokens to identities.

use async_trait::async_trait;

use crate::domain::{SessionToken, UserId};

/// Failures raised by session resolver adapters.
///
/// A token the provider does not recognise is not an error; resolvers report
/// that as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionResolverError {
    /// The auth provider could not be reached.
    #[error("auth provider unreachable: {message}")]
    Transport {
        /// Transport-level failure description.
        message: String,
    },
    /// The auth provider answered with an unusable payload.
    #[error("auth provider response could not be decoded: {message}")]
    Decode {
        /// Decode failure description.
        message: String,
    },
}

impl SessionResolverError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error with the given message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Resolve opaque session tokens against the external auth provider.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve `token` to the identity it was issued for, or `None` when the
    /// provider rejects it.
    async fn resolve(&self, token: &SessionToken)
    -> Result<Option<UserId>, SessionResolverError>;
}
