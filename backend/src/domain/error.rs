//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; the stable [`ErrorCode`] identifies the failure category and the
//! message stays human readable.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// The caller's credit balance does not cover the requested operation.
    InsufficientCredits,
    /// The profile record could not be read.
    ProfileUnavailable,
    /// The external processing webhook failed or rejected the request.
    UpstreamFailure,
    /// The webhook answered with something other than the agreed contract.
    UpstreamMisconfigured,
    /// The result artifact could not be persisted to object storage.
    StorageFailure,
    /// The credit debit failed after the artifact was stored.
    SettlementFailure,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use posterforge::domain::{Error, ErrorCode};
///
/// let err = Error::unauthorized("login required");
/// assert_eq!(err.code(), ErrorCode::Unauthorized);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    /// The message was empty after trimming.
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::InsufficientCredits`],
    /// recording the observed balance and the requested cost.
    pub fn insufficient_credits(available: i64, cost: u32) -> Self {
        Self::new(
            ErrorCode::InsufficientCredits,
            "credit balance does not cover this operation",
        )
        .with_details(json!({
            "availableCredits": available,
            "requiredCredits": cost,
        }))
    }

    /// Convenience constructor for [`ErrorCode::ProfileUnavailable`].
    pub fn profile_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ProfileUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::UpstreamFailure`]. When the
    /// webhook answered with a definite HTTP status it is carried in the
    /// details so the inbound adapter can relay it verbatim.
    pub fn upstream_failure(message: impl Into<String>, status: Option<u16>) -> Self {
        let error = Self::new(ErrorCode::UpstreamFailure, message);
        match status {
            Some(code) => error.with_details(json!({ "upstreamStatus": code })),
            None => error,
        }
    }

    /// Convenience constructor for [`ErrorCode::UpstreamMisconfigured`].
    pub fn upstream_misconfigured(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamMisconfigured, message)
    }

    /// Convenience constructor for [`ErrorCode::StorageFailure`].
    pub fn storage_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::SettlementFailure`].
    pub fn settlement_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SettlementFailure, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Upstream HTTP status recorded by [`Error::upstream_failure`], if any.
    pub fn upstream_status(&self) -> Option<u16> {
        self.details
            .as_ref()
            .and_then(|details| details.get("upstreamStatus"))
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_blank_messages() {
        let err = Error::try_new(ErrorCode::InternalError, "   ");
        assert_eq!(err, Err(ErrorValidationError::EmptyMessage));
    }

    #[test]
    fn insufficient_credits_records_balance_and_cost() {
        let err = Error::insufficient_credits(0, 1);
        assert_eq!(err.code(), ErrorCode::InsufficientCredits);
        let details = err.details().expect("details should be attached");
        assert_eq!(details["availableCredits"], 0);
        assert_eq!(details["requiredCredits"], 1);
    }

    #[test]
    fn upstream_failure_carries_verbatim_status() {
        let err = Error::upstream_failure("webhook failed with status 503", Some(503));
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[test]
    fn upstream_failure_without_status_has_no_details() {
        let err = Error::upstream_failure("connection reset", None);
        assert_eq!(err.upstream_status(), None);
        assert!(err.details().is_none());
    }

    #[test]
    fn serialises_with_camel_case_code() {
        let err = Error::unauthorized("login required");
        let value = serde_json::to_value(&err).expect("error should serialise");
        assert_eq!(value["code"], "unauthorized");
        assert_eq!(value["message"], "login required");
    }
}
