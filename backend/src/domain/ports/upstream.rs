//! Port abstraction for the external processing webhook.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{ToolMode, UserId};

/// One processing job forwarded to the webhook.
///
/// Mirrors the inbound multipart body: the image blob plus the optional
/// metadata fields the original form carries. The payload is transient and
/// never retained when forwarding fails.
#[derive(Debug, Clone)]
pub struct UpstreamJob {
    /// Uploaded image bytes.
    pub image: Bytes,
    /// Content type declared for the image part, when known.
    pub image_content_type: Option<String>,
    /// Client-supplied filename.
    pub filename: Option<String>,
    /// Client-supplied ISO-8601 timestamp.
    pub timestamp: Option<String>,
    /// Requested operation mode.
    pub mode: ToolMode,
    /// Identity the job runs for.
    pub user_id: UserId,
}

/// Binary result returned by the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamArtifact {
    /// Content type observed on the response, `image/png` when absent.
    pub content_type: String,
    /// Result artifact bytes.
    pub bytes: Bytes,
}

/// Failures raised by upstream adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    /// The webhook could not be reached.
    #[error("webhook unreachable: {message}")]
    Transport {
        /// Transport failure description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("webhook timed out: {message}")]
    Timeout {
        /// Timeout description.
        message: String,
    },
    /// The webhook answered with a non-success HTTP status.
    #[error("webhook failed with status {status}: {message}")]
    Status {
        /// Verbatim upstream status code, relayed to the caller.
        status: u16,
        /// Body preview or status text.
        message: String,
    },
    /// The webhook reported a processing error in a JSON envelope.
    #[error("webhook rejected the job: {message}")]
    Rejected {
        /// Error message surfaced by the webhook.
        message: String,
    },
    /// The webhook answered outside the agreed response contract.
    #[error("webhook is misconfigured: {message}")]
    Misconfigured {
        /// Contract violation description.
        message: String,
    },
}

impl UpstreamError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a timeout error with the given message.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a status error carrying the verbatim upstream status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a rejected error with the webhook's own message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Create a misconfiguration error with the given message.
    pub fn misconfigured(message: impl Into<String>) -> Self {
        Self::Misconfigured {
            message: message.into(),
        }
    }
}

/// Forward jobs to the external processing webhook and await the result.
#[async_trait]
pub trait ProcessingUpstream: Send + Sync {
    /// Run one job to completion. No retries beyond the adapter's configured
    /// transport budget; every failure is surfaced exactly once.
    async fn transform(&self, job: UpstreamJob) -> Result<UpstreamArtifact, UpstreamError>;
}
