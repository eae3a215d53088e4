//! Upload endpoint.
//!
//! ```text
//! POST /api/v1/uploads (multipart/form-data)
//! ```
//!
//! Accepts the poster image plus optional metadata fields, runs the
//! credit-gated flow, and streams the processed artifact back with the
//! content type the webhook produced.

use actix_multipart::form::bytes::Bytes as UploadedBytes;
use actix_multipart::form::text::Text;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::{HttpResponse, post, web};

use crate::domain::{Error, ToolMode, UploadRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Multipart fields accepted by the upload endpoint.
///
/// `userId` is accepted for compatibility with the original form but never
/// trusted; identity always comes from the session.
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    /// Image blob. Required, enforced in the handler so the rejection uses
    /// the standard error envelope.
    #[multipart(limit = "20MiB")]
    pub image: Option<UploadedBytes>,
    /// Client-supplied filename.
    pub filename: Option<Text<String>>,
    /// Client-supplied ISO-8601 timestamp.
    pub timestamp: Option<Text<String>>,
    /// Requested operation mode; unknown values fall back to `poster`.
    pub mode: Option<Text<String>>,
    /// Ignored; see struct docs.
    #[multipart(rename = "userId")]
    pub user_id: Option<Text<String>>,
}

/// Multipart configuration routing extraction failures through the standard
/// error envelope instead of actix's plain-text default.
pub fn multipart_form_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(25 * 1024 * 1024)
        .error_handler(|err, _req| {
            ApiError::from(Error::invalid_request(format!(
                "invalid multipart payload: {err}"
            )))
            .into()
        })
}

/// Process one uploaded image through the external webhook, gated by the
/// caller's credit balance.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Processed image bytes", content_type = "image/png"),
        (status = 400, description = "Malformed multipart payload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Insufficient credits", body = ErrorSchema),
        (status = 500, description = "Upstream, storage or settlement failure", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage"
)]
#[post("/uploads")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> ApiResult<HttpResponse> {
    let user_id = session.resolve_user(state.sessions.as_ref()).await?;

    let image = form
        .image
        .ok_or_else(|| Error::invalid_request("multipart field `image` is required"))?;
    let mode = form
        .mode
        .map_or_else(ToolMode::default, |text| ToolMode::parse_or_default(&text.0));

    let request = UploadRequest {
        image: image.data,
        image_content_type: image.content_type.map(|mime| mime.to_string()),
        filename: form.filename.map(|text| text.0).or(image.file_name),
        timestamp: form.timestamp.map(|text| text.0),
        mode,
    };

    let artifact = state.gateway.process(&user_id, request).await?;
    Ok(HttpResponse::Ok()
        .content_type(artifact.content_type.as_str())
        .body(artifact.bytes))
}
