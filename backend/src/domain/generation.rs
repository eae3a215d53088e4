//! Generation history entries and artifact keys.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::UserId;

/// Object-store key for a stored result artifact.
///
/// Keys take the shape `{identity}/{epoch-millis}.png`, so one caller's
/// artifacts share a prefix and keys never collide within a millisecond.
/// Stored objects are retained indefinitely and publicly addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    /// Derive the key for an artifact produced for `user_id` at `stored_at`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use posterforge::domain::{ArtifactKey, UserId};
    ///
    /// let id = UserId::new("123e4567-e89b-12d3-a456-426614174000").expect("valid id");
    /// let at = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("valid instant");
    /// let key = ArtifactKey::derive(&id, at);
    /// assert_eq!(
    ///     key.as_str(),
    ///     "123e4567-e89b-12d3-a456-426614174000/1700000000000.png"
    /// );
    /// ```
    pub fn derive(user_id: &UserId, stored_at: DateTime<Utc>) -> Self {
        Self(format!("{user_id}/{}.png", stored_at.timestamp_millis()))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only history entry describing one successful generation.
///
/// A record exists if and only if the credit debit for that request
/// succeeded; it is never updated or deleted by the upload flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    /// Primary key.
    pub id: Uuid,
    /// Identity the artifact was produced for.
    pub user_id: UserId,
    /// Public URL of the stored artifact.
    pub image_url: String,
    /// Mode-derived label shown in the history listing.
    pub label: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl GenerationRecord {
    /// Build a new record for a freshly settled generation.
    pub fn new(user_id: UserId, image_url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            image_url: image_url.into(),
            label: label.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn artifact_keys_are_prefixed_by_identity() {
        let id = UserId::random();
        let at = Utc
            .timestamp_millis_opt(1_700_000_000_000)
            .single()
            .expect("valid instant");
        let key = ArtifactKey::derive(&id, at);
        assert!(key.as_str().starts_with(&id.to_string()));
        assert!(key.as_str().ends_with("1700000000000.png"));
    }
}
