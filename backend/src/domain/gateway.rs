//! Upload gateway domain service.
//!
//! Orchestrates the credit-gated upload flow: cost resolution, balance
//! check, forwarding to the processing webhook, artifact persistence, the
//! atomic credit debit, and the best-effort history append. Control flows
//! strictly forward; no step revisits an earlier one, and nothing is settled
//! when forwarding fails.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::ports::{
    ArtifactStore, ArtifactStoreError, DebitOutcome, GenerationLog, ProcessingUpstream,
    ProfileRepository, ProfileRepositoryError, UpstreamError, UpstreamJob,
};
use crate::domain::{ArtifactKey, Error, GenerationRecord, ToolMode, UserId};

/// One validated upload request, ready for forwarding.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Uploaded image bytes.
    pub image: Bytes,
    /// Content type declared for the image part, when known.
    pub image_content_type: Option<String>,
    /// Client-supplied filename.
    pub filename: Option<String>,
    /// Client-supplied ISO-8601 timestamp.
    pub timestamp: Option<String>,
    /// Requested operation mode (already defaulted for unknown inputs).
    pub mode: ToolMode,
}

/// A settled result artifact, ready to return to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedArtifact {
    /// Content type mirrored from the webhook response.
    pub content_type: String,
    /// Artifact bytes.
    pub bytes: Bytes,
    /// Public URL the artifact was persisted under.
    pub stored_url: String,
}

/// Service implementing the upload flow over the driven ports.
#[derive(Clone)]
pub struct UploadGateway {
    profiles: Arc<dyn ProfileRepository>,
    generations: Arc<dyn GenerationLog>,
    artifacts: Arc<dyn ArtifactStore>,
    upstream: Arc<dyn ProcessingUpstream>,
}

impl UploadGateway {
    /// Create a gateway over the given port implementations.
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        generations: Arc<dyn GenerationLog>,
        artifacts: Arc<dyn ArtifactStore>,
        upstream: Arc<dyn ProcessingUpstream>,
    ) -> Self {
        Self {
            profiles,
            generations,
            artifacts,
            upstream,
        }
    }

    /// Run one upload to completion for an already-authenticated identity.
    ///
    /// Ordering: the balance pre-check happens before any side effect, the
    /// debit happens only after the artifact is stored, and the history row
    /// is appended only after the debit succeeded. The response is produced
    /// only once settlement finished, so a delivered artifact is always a
    /// billed artifact.
    ///
    /// # Errors
    ///
    /// Returns a domain [`Error`] for every failure except a history append,
    /// which is logged and swallowed so bookkeeping never blocks delivery.
    pub async fn process(
        &self,
        user_id: &UserId,
        request: UploadRequest,
    ) -> Result<ProcessedArtifact, Error> {
        let cost = request.mode.cost();
        self.check_balance(user_id, cost).await?;

        let artifact = self
            .upstream
            .transform(UpstreamJob {
                image: request.image,
                image_content_type: request.image_content_type,
                filename: request.filename,
                timestamp: request.timestamp,
                mode: request.mode,
                user_id: user_id.clone(),
            })
            .await
            .map_err(map_upstream_error)?;

        let key = ArtifactKey::derive(user_id, Utc::now());
        self.artifacts
            .put(&key, artifact.bytes.clone(), &artifact.content_type)
            .await
            .map_err(map_storage_error)?;
        let stored_url = self.artifacts.public_url(&key);

        self.settle(user_id, cost).await?;
        self.append_history(user_id, &stored_url, request.mode).await;

        info!(
            user_id = %user_id,
            mode = %request.mode,
            key = %key,
            bytes = artifact.bytes.len(),
            "upload settled"
        );
        Ok(ProcessedArtifact {
            content_type: artifact.content_type,
            bytes: artifact.bytes,
            stored_url,
        })
    }

    /// Reject callers whose balance cannot cover `cost` before any side
    /// effect occurs. A missing profile row counts as a zero balance.
    async fn check_balance(&self, user_id: &UserId, cost: u32) -> Result<(), Error> {
        let credits = self
            .profiles
            .find_by_user_id(user_id)
            .await
            .map_err(map_profile_error)?
            .map_or(0, |profile| profile.credits);
        if credits < i64::from(cost) {
            return Err(Error::insufficient_credits(credits, cost));
        }
        Ok(())
    }

    /// Debit the balance once the artifact is stored. The conditional debit
    /// closes the race between concurrent uploads: a caller whose balance was
    /// spent since the pre-check gets insufficient-credits, not a negative
    /// balance.
    async fn settle(&self, user_id: &UserId, cost: u32) -> Result<(), Error> {
        let outcome = self
            .profiles
            .debit(user_id, cost)
            .await
            .map_err(|error| Error::settlement_failure(error.to_string()))?;
        match outcome {
            DebitOutcome::Applied { remaining } => {
                info!(user_id = %user_id, cost, remaining, "credits debited");
                Ok(())
            }
            DebitOutcome::InsufficientCredits { available } => {
                Err(Error::insufficient_credits(available, cost))
            }
        }
    }

    /// Best-effort history append. Failure is logged, never surfaced, so a
    /// bookkeeping outage cannot block delivery of a settled artifact.
    async fn append_history(&self, user_id: &UserId, stored_url: &str, mode: ToolMode) {
        let record = GenerationRecord::new(user_id.clone(), stored_url, mode.history_label());
        if let Err(error) = self.generations.append(&record).await {
            warn!(
                user_id = %user_id,
                %error,
                "generation history append failed; artifact already settled"
            );
        }
    }
}

fn map_profile_error(error: ProfileRepositoryError) -> Error {
    Error::profile_unavailable(error.to_string())
}

fn map_storage_error(error: ArtifactStoreError) -> Error {
    Error::storage_failure(error.to_string())
}

fn map_upstream_error(error: UpstreamError) -> Error {
    match error {
        UpstreamError::Status { status, message } => {
            Error::upstream_failure(non_blank_or(message, "webhook call failed"), Some(status))
        }
        UpstreamError::Transport { message }
        | UpstreamError::Timeout { message }
        | UpstreamError::Rejected { message } => {
            Error::upstream_failure(non_blank_or(message, "webhook call failed"), None)
        }
        UpstreamError::Misconfigured { message } => Error::upstream_misconfigured(non_blank_or(
            message,
            "webhook response violated the contract",
        )),
    }
}

/// Adapter messages flow into [`Error`] constructors, which refuse blank
/// messages; substitute a fallback rather than trusting the adapter.
fn non_blank_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}
