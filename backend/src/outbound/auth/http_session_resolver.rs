//! Reqwest-backed session resolver adapter.
//!
//! This adapter owns transport details only: it presents the opaque token to
//! the auth provider's user-info endpoint and decodes the identity from the
//! response. Token semantics stay entirely with the provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::ports::{SessionResolver, SessionResolverError};
use crate::domain::{SessionToken, UserId};

/// Minimal shape of the provider's user-info response.
#[derive(Debug, Deserialize)]
struct UserInfoDto {
    id: String,
}

/// Session resolver performing HTTPS calls against one user-info endpoint.
pub struct HttpSessionResolver {
    client: Client,
    endpoint: Url,
}

impl HttpSessionResolver {
    /// Build a resolver with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SessionResolver for HttpSessionResolver {
    async fn resolve(
        &self,
        token: &SessionToken,
    ) -> Result<Option<UserId>, SessionResolverError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(token.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| SessionResolverError::transport(error.to_string()))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SessionResolverError::transport(format!(
                "user-info endpoint answered status {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| SessionResolverError::transport(error.to_string()))?;
        decode_identity(body.as_ref()).map(Some)
    }
}

fn decode_identity(body: &[u8]) -> Result<UserId, SessionResolverError> {
    let decoded: UserInfoDto = serde_json::from_slice(body).map_err(|error| {
        SessionResolverError::decode(format!("invalid user-info payload: {error}"))
    })?;
    UserId::new(&decoded.id).map_err(|error| {
        SessionResolverError::decode(format!("provider returned an invalid user id: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_uuid_identity() {
        let body = br#"{"id": "123e4567-e89b-12d3-a456-426614174000", "email": "t@example.org"}"#;
        let id = decode_identity(body).expect("valid payload");
        assert_eq!(id.to_string(), "123e4567-e89b-12d3-a456-426614174000");
    }

    #[test]
    fn rejects_non_uuid_identities() {
        let error = decode_identity(br#"{"id": "user-42"}"#).expect_err("invalid id");
        assert!(matches!(error, SessionResolverError::Decode { .. }));
    }

    #[test]
    fn rejects_unparseable_payloads() {
        let error = decode_identity(b"<html>gateway timeout</html>").expect_err("not JSON");
        assert!(matches!(error, SessionResolverError::Decode { .. }));
    }
}
