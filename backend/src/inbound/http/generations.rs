//! Profile and generation-history endpoints.
//!
//! ```text
//! GET /api/v1/profile
//! GET /api/v1/generations
//! ```
//!
//! Read-only views backing the dashboard: the remaining credit balance and
//! the caller's generation history, newest first.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Error, GenerationRecord, Profile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// History listings are capped; the dashboard never pages deeper.
const HISTORY_LIMIT: i64 = 50;

/// Response payload for the caller's profile.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Caller identity.
    pub user_id: String,
    /// Remaining credit balance; zero when no profile row exists yet.
    pub credits: i64,
}

/// Response payload for one generation history entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Public URL of the stored artifact.
    pub image_url: String,
    /// Mode-derived label.
    pub label: String,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
}

impl From<GenerationRecord> for GenerationResponse {
    fn from(value: GenerationRecord) -> Self {
        Self {
            image_url: value.image_url,
            label: value.label,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// Fetch the authenticated caller's credit balance.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile with credit balance", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.resolve_user(state.sessions.as_ref()).await?;
    let profile = state
        .profiles
        .find_by_user_id(&user_id)
        .await
        .map_err(|error| Error::profile_unavailable(error.to_string()))?;
    let credits = profile.as_ref().map_or(0, |row: &Profile| row.credits);
    Ok(HttpResponse::Ok().json(ProfileResponse {
        user_id: user_id.to_string(),
        credits,
    }))
}

/// List the authenticated caller's generation history, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/generations",
    responses(
        (status = 200, description = "Generation history", body = [GenerationResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["generations"],
    operation_id = "listGenerations"
)]
#[get("/generations")]
pub async fn list_generations(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.resolve_user(state.sessions.as_ref()).await?;
    let records = state
        .generations
        .list_for_user(&user_id, HISTORY_LIMIT)
        .await
        .map_err(|error| Error::internal(format!("history listing failed: {error}")))?;
    let body: Vec<GenerationResponse> = records.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}
