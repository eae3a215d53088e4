//! Session-token extraction for HTTP handlers.
//!
//! The backend never interprets credentials itself; it lifts the opaque token
//! from the `Authorization: Bearer` header (or the `session` cookie set by
//! the auth provider's frontend SDK) and hands it to the configured
//! [`crate::domain::ports::SessionResolver`].

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, SessionToken, UserId};
use crate::domain::ports::SessionResolver;

use super::ApiResult;

/// Cookie carrying the session token when no bearer header is present.
pub(crate) const SESSION_COOKIE: &str = "session";

/// Extracted (but not yet resolved) caller credentials.
#[derive(Clone)]
pub struct SessionContext {
    token: Option<SessionToken>,
}

impl SessionContext {
    /// Build a context from an optional raw token.
    pub fn new(token: Option<SessionToken>) -> Self {
        Self { token }
    }

    /// The raw token, when the request carried one.
    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Require a token or fail with `401 Unauthorized`.
    pub fn require_token(&self) -> Result<&SessionToken, Error> {
        self.token
            .as_ref()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the caller's identity through the auth provider.
    ///
    /// # Errors
    ///
    /// `401 Unauthorized` when the token is absent or the provider rejects
    /// it; an internal error when the provider itself is unreachable.
    pub async fn resolve_user(&self, resolver: &dyn SessionResolver) -> ApiResult<UserId> {
        let token = self.require_token()?;
        let resolved = resolver
            .resolve(token)
            .await
            .map_err(|error| Error::internal(format!("session resolution failed: {error}")))?;
        resolved
            .ok_or_else(|| Error::unauthorized("session expired or invalid"))
            .map_err(Into::into)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<SessionToken> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let raw = value.strip_prefix("Bearer ")?;
    SessionToken::new(raw).ok()
}

fn cookie_token(req: &HttpRequest) -> Option<SessionToken> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    SessionToken::new(cookie.value()).ok()
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req).or_else(|| cookie_token(req));
        ready(Ok(Self::new(token)))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    async fn extract(req: HttpRequest) -> SessionContext {
        SessionContext::from_request(&req, &mut Payload::None)
            .await
            .expect("extraction is infallible")
    }

    #[actix_web::test]
    async fn prefers_the_bearer_header() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer header-token"))
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "cookie-token"))
            .to_http_request();
        let ctx = extract(req).await;
        assert_eq!(
            ctx.token().map(SessionToken::as_str),
            Some("header-token")
        );
    }

    #[actix_web::test]
    async fn falls_back_to_the_session_cookie() {
        let req = TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "cookie-token"))
            .to_http_request();
        let ctx = extract(req).await;
        assert_eq!(
            ctx.token().map(SessionToken::as_str),
            Some("cookie-token")
        );
    }

    #[actix_web::test]
    async fn missing_credentials_require_token_fails() {
        let ctx = extract(TestRequest::default().to_http_request()).await;
        let error = ctx.require_token().expect_err("no token present");
        assert_eq!(error.code(), crate::domain::ErrorCode::Unauthorized);
    }

    #[actix_web::test]
    async fn malformed_authorization_header_is_ignored() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwdw=="))
            .to_http_request();
        let ctx = extract(req).await;
        assert!(ctx.token().is_none());
    }
}
