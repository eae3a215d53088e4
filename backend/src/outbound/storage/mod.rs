//! Artifact storage adapters.

mod object_store_artifacts;

pub use object_store_artifacts::ObjectStoreArtifacts;
