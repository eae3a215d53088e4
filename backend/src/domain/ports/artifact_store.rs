//! Port abstraction for result artifact storage.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::ArtifactKey;

/// Storage errors raised by artifact store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactStoreError {
    /// An object already exists under the derived key.
    #[error("artifact already exists at {key}")]
    AlreadyExists {
        /// The conflicting key.
        key: String,
    },
    /// The store rejected or failed the upload.
    #[error("artifact upload failed: {message}")]
    Upload {
        /// Upload failure description.
        message: String,
    },
}

impl ArtifactStoreError {
    /// Create an already-exists error for the given key.
    pub fn already_exists(key: impl Into<String>) -> Self {
        Self::AlreadyExists { key: key.into() }
    }

    /// Create an upload error with the given message.
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }
}

/// Content-addressed artifact storage with public URLs.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key` without overwriting an existing object.
    async fn put(
        &self,
        key: &ArtifactKey,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), ArtifactStoreError>;

    /// Public URL of a stored object. Always available once `put` succeeded.
    fn public_url(&self, key: &ArtifactKey) -> String;
}
