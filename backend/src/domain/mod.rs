//! Domain types and the upload gateway service.
//!
//! Purpose: define the strongly typed entities of the credit-gated upload
//! flow and the service orchestrating it. Types are immutable; invariants and
//! serialisation contracts are documented on each type. Transport concerns
//! (HTTP status codes, multipart parsing) live in the inbound adapter.

pub mod error;
pub mod gateway;
pub mod generation;
pub mod identity;
pub mod mode;
pub mod ports;
pub mod profile;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gateway::{ProcessedArtifact, UploadGateway, UploadRequest};
pub use self::generation::{ArtifactKey, GenerationRecord};
pub use self::identity::{IdentityValidationError, SessionToken, TokenValidationError, UserId};
pub use self::mode::ToolMode;
pub use self::profile::Profile;

/// Response header carrying the request-scoped trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient result alias for domain operations surfaced to adapters.
pub type DomainResult<T> = Result<T, Error>;
