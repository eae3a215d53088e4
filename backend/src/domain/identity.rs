//! Caller identity primitives.
//!
//! The auth provider issues opaque session tokens and UUID user identifiers.
//! [`SessionToken`] wraps the raw token without interpreting it; [`UserId`]
//! is the resolved identity used for credit bookkeeping and storage keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation failures for [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a canonical UUID.
    #[error("user id must be a UUID")]
    InvalidId,
}

/// Opaque user reference assigned by the external auth provider.
///
/// Immutable once issued; the provider guarantees UUID shape.
///
/// # Examples
/// ```
/// use posterforge::domain::UserId;
///
/// let id = UserId::new("123e4567-e89b-12d3-a456-426614174000").expect("valid id");
/// assert_eq!(id.to_string(), "123e4567-e89b-12d3-a456-426614174000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityValidationError`] when the input is empty or not a
    /// UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| IdentityValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Wrap an already-parsed UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random identity, useful in tests and fixtures.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for [`SessionToken`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenValidationError {
    /// The token was empty after trimming.
    #[error("session token must not be empty")]
    Empty,
}

/// Opaque session token presented by the caller.
///
/// The token is never interpreted locally; the external auth provider is the
/// only party that can resolve it to an identity.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Validate and wrap a raw token string.
    ///
    /// # Errors
    ///
    /// Returns [`TokenValidationError::Empty`] when the token is blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, TokenValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TokenValidationError::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw token for forwarding to the auth provider.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Tokens are credentials; never echo them in logs or errors.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}
