//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the structure of their corresponding domain types but
//! live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller's credit balance does not cover the requested operation.
    #[schema(rename = "insufficient_credits")]
    InsufficientCredits,
    /// The profile record could not be read.
    #[schema(rename = "profile_unavailable")]
    ProfileUnavailable,
    /// The external processing webhook failed or rejected the request.
    #[schema(rename = "upstream_failure")]
    UpstreamFailure,
    /// The webhook answered outside the agreed response contract.
    #[schema(rename = "upstream_misconfigured")]
    UpstreamMisconfigured,
    /// The result artifact could not be persisted.
    #[schema(rename = "storage_failure")]
    StorageFailure,
    /// The credit debit failed after the artifact was stored.
    #[schema(rename = "settlement_failure")]
    SettlementFailure,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for the API error envelope.
#[derive(ToSchema)]
#[schema(as = crate::inbound::http::ApiError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "insufficient_credits")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "credit balance does not cover this operation")]
    message: String,
    /// Request-scoped trace identifier, echoed in the `trace-id` header.
    #[schema(example = "6f2b2d1e-0d5c-4b4e-9d5f-0f3a2d9c8b7a")]
    trace_id: Option<String>,
}
