//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the auth provider, PostgreSQL, object storage, and the processing
//! webhook). Each trait exposes strongly typed errors so adapters map their
//! failures into predictable variants instead of returning `anyhow::Result`.

pub mod artifact_store;
pub mod generation_log;
pub mod profile_repository;
pub mod session_resolver;
pub mod upstream;

pub use self::artifact_store::{ArtifactStore, ArtifactStoreError};
pub use self::generation_log::{GenerationLog, GenerationLogError};
pub use self::profile_repository::{DebitOutcome, ProfileRepository, ProfileRepositoryError};
pub use self::session_resolver::{SessionResolver, SessionResolverError};
pub use self::upstream::{ProcessingUpstream, UpstreamArtifact, UpstreamError, UpstreamJob};
