//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and the gateway service, staying testable without
//! real I/O.

use std::sync::Arc;

use crate::domain::UploadGateway;
use crate::domain::ports::{GenerationLog, ProfileRepository, SessionResolver};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Session resolution against the external auth provider.
    pub sessions: Arc<dyn SessionResolver>,
    /// The upload flow service.
    pub gateway: Arc<UploadGateway>,
    /// Profile reads for the credit display endpoint.
    pub profiles: Arc<dyn ProfileRepository>,
    /// History reads for the generations listing.
    pub generations: Arc<dyn GenerationLog>,
}

impl HttpState {
    /// Bundle the ports the HTTP surface needs.
    pub fn new(
        sessions: Arc<dyn SessionResolver>,
        gateway: Arc<UploadGateway>,
        profiles: Arc<dyn ProfileRepository>,
        generations: Arc<dyn GenerationLog>,
    ) -> Self {
        Self {
            sessions,
            gateway,
            profiles,
            generations,
        }
    }
}
