//! Artifact store backed by the `object_store` crate.
//!
//! One adapter covers every configured backend (S3-compatible, local
//! filesystem, in-memory) because they all share the `ObjectStore` trait.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutMode, PutOptions, PutPayload};

use crate::domain::ArtifactKey;
use crate::domain::ports::{ArtifactStore, ArtifactStoreError};

/// Artifact store delegating to any [`ObjectStore`] implementation.
pub struct ObjectStoreArtifacts {
    store: Arc<dyn ObjectStore>,
    public_base: String,
}

impl ObjectStoreArtifacts {
    /// Wrap a store with the public base URL its objects are served from.
    pub fn new(store: Arc<dyn ObjectStore>, public_base: impl Into<String>) -> Self {
        let public_base = public_base.into().trim_end_matches('/').to_owned();
        Self { store, public_base }
    }
}

#[async_trait]
impl ArtifactStore for ObjectStoreArtifacts {
    async fn put(
        &self,
        key: &ArtifactKey,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), ArtifactStoreError> {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_owned().into());

        let options = PutOptions {
            mode: PutMode::Create,
            attributes,
            ..PutOptions::default()
        };

        self.store
            .put_opts(&Path::from(key.as_str()), PutPayload::from(bytes), options)
            .await
            .map(|_| ())
            .map_err(|error| map_store_error(key, error))
    }

    fn public_url(&self, key: &ArtifactKey) -> String {
        format!("{}/{}", self.public_base, key.as_str())
    }
}

fn map_store_error(key: &ArtifactKey, error: object_store::Error) -> ArtifactStoreError {
    match error {
        object_store::Error::AlreadyExists { .. } => {
            ArtifactStoreError::already_exists(key.as_str())
        }
        other => ArtifactStoreError::upload(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use object_store::memory::InMemory;

    use super::*;
    use crate::domain::UserId;

    fn fixture() -> (ObjectStoreArtifacts, ArtifactKey) {
        let store = ObjectStoreArtifacts::new(Arc::new(InMemory::new()), "https://cdn.test/posters/");
        let key = ArtifactKey::derive(&UserId::random(), Utc::now());
        (store, key)
    }

    #[tokio::test]
    async fn stores_and_addresses_an_artifact() {
        let (store, key) = fixture();

        store
            .put(&key, Bytes::from_static(b"\x89PNG"), "image/png")
            .await
            .expect("first put succeeds");

        let url = store.public_url(&key);
        assert_eq!(url, format!("https://cdn.test/posters/{key}"));
    }

    #[tokio::test]
    async fn refuses_to_overwrite_an_existing_key() {
        let (store, key) = fixture();
        store
            .put(&key, Bytes::from_static(b"first"), "image/png")
            .await
            .expect("first put succeeds");

        let error = store
            .put(&key, Bytes::from_static(b"second"), "image/png")
            .await
            .expect_err("second put conflicts");
        assert!(matches!(error, ArtifactStoreError::AlreadyExists { .. }));
    }
}
