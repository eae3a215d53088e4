//! Posterforge backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds transport-agnostic
//! types, the upload gateway service, and the ports it drives; `inbound`
//! adapts HTTP requests onto the domain; `outbound` implements the ports
//! against PostgreSQL, object storage, and the external auth and processing
//! collaborators.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-scoped tracing middleware.
pub use middleware::trace::Trace;
