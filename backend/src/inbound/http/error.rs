//! HTTP error payloads and mapping from domain errors.
//!
//! Keep the domain free of transport concerns by translating
//! [`crate::domain::Error`] into Actix responses here. Status mapping follows
//! the upload flow contract: 401 for missing identity, 403 for an uncovered
//! balance, the verbatim upstream status when the webhook answered with one,
//! and 500 for the remaining server-side failures.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::domain::{Error as DomainError, ErrorCode, TRACE_ID_HEADER};
use crate::middleware::trace::TraceId;

/// Standard error envelope returned by HTTP adapters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip)]
    upstream_status: Option<u16>,
}

impl ApiError {
    /// Construct an API error from a domain failure, capturing any ambient
    /// trace identifier.
    pub fn from_domain(error: DomainError) -> Self {
        let upstream_status = error.upstream_status();
        Self {
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: error.details().cloned(),
            upstream_status,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    fn to_status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::InsufficientCredits => StatusCode::FORBIDDEN,
            ErrorCode::UpstreamFailure => self
                .upstream_status
                .and_then(|status| StatusCode::from_u16(status).ok())
                .filter(|status| status.is_client_error() || status.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorCode::ProfileUnavailable
            | ErrorCode::UpstreamMisconfigured
            | ErrorCode::StorageFailure
            | ErrorCode::SettlementFailure
            | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        Self::from_domain(value)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &self.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        if matches!(self.code, ErrorCode::InternalError) {
            let mut redacted = self.clone();
            redacted.message = "Internal server error".to_owned();
            redacted.details = None;
            return builder.json(redacted);
        }
        builder.json(self)
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::Error;

    #[rstest]
    #[case::unauthorized(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
    #[case::insufficient(Error::insufficient_credits(0, 1), StatusCode::FORBIDDEN)]
    #[case::invalid(Error::invalid_request("image part missing"), StatusCode::BAD_REQUEST)]
    #[case::profile(Error::profile_unavailable("pool down"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::misconfigured(
        Error::upstream_misconfigured("metadata instead of binary"),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case::storage(Error::storage_failure("bucket gone"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case::settlement(Error::settlement_failure("debit failed"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_domain_codes_to_statuses(#[case] error: Error, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(error).status_code(), expected);
    }

    #[test]
    fn upstream_status_is_relayed_verbatim() {
        let error = Error::upstream_failure("webhook failed with status 429", Some(429));
        assert_eq!(ApiError::from(error).status_code(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn upstream_without_status_defaults_to_server_error() {
        let error = Error::upstream_failure("connection reset", None);
        assert_eq!(
            ApiError::from(error).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn nonsensical_upstream_status_is_not_relayed() {
        let error = Error::upstream_failure("odd status", Some(204));
        assert_eq!(
            ApiError::from(error).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_are_redacted() {
        let error = Error::internal("connection string leaked here");
        let response = ApiError::from(error).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
