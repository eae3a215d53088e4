//! Reqwest adapter forwarding jobs to the processing webhook.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::classify_response;
use crate::domain::ports::{ProcessingUpstream, UpstreamArtifact, UpstreamError, UpstreamJob};

/// Processing upstream speaking multipart/form-data to one webhook endpoint.
pub struct HttpProcessingUpstream {
    client: Client,
    endpoint: Url,
    transport_retries: u32,
}

impl HttpProcessingUpstream {
    /// Build a forwarder with an explicit end-to-end timeout and a transport
    /// retry budget. Retries apply to connection failures and timeouts only;
    /// a response from the webhook, whatever its status, is final.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        timeout: Duration,
        transport_retries: u32,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            transport_retries,
        })
    }

    fn build_form(&self, job: &UpstreamJob) -> Result<Form, UpstreamError> {
        let mut image = Part::stream(job.image.clone())
            .file_name(job.filename.clone().unwrap_or_else(|| "upload.png".to_owned()));
        if let Some(content_type) = &job.image_content_type {
            image = image.mime_str(content_type).map_err(|error| {
                UpstreamError::transport(format!("invalid image content type: {error}"))
            })?;
        }

        let mut form = Form::new()
            .part("image", image)
            .text("mode", job.mode.as_str())
            .text("userId", job.user_id.to_string());
        if let Some(filename) = &job.filename {
            form = form.text("filename", filename.clone());
        }
        if let Some(timestamp) = &job.timestamp {
            form = form.text("timestamp", timestamp.clone());
        }
        Ok(form)
    }

    async fn send_once(&self, job: &UpstreamJob) -> Result<UpstreamArtifact, UpstreamError> {
        let form = self.build_form(job)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(UpstreamError::status(
                status.as_u16(),
                status_message(status, &body),
            ));
        }

        classify_response(content_type.as_deref(), body)
    }
}

#[async_trait]
impl ProcessingUpstream for HttpProcessingUpstream {
    async fn transform(&self, job: UpstreamJob) -> Result<UpstreamArtifact, UpstreamError> {
        let mut attempt = 0;
        loop {
            match self.send_once(&job).await {
                Ok(artifact) => return Ok(artifact),
                Err(error) if is_retryable(&error) && attempt < self.transport_retries => {
                    attempt += 1;
                    debug!(attempt, %error, "retrying webhook call after transport failure");
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Only failures where the webhook never answered are safe to retry.
fn is_retryable(error: &UpstreamError) -> bool {
    matches!(
        error,
        UpstreamError::Transport { .. } | UpstreamError::Timeout { .. }
    )
}

fn map_transport_error(error: reqwest::Error) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::timeout(error.to_string())
    } else {
        UpstreamError::transport(error.to_string())
    }
}

fn status_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_timeout_errors_are_retryable() {
        assert!(is_retryable(&UpstreamError::transport("connection refused")));
        assert!(is_retryable(&UpstreamError::timeout("deadline exceeded")));
    }

    #[test]
    fn answered_requests_are_never_retried() {
        assert!(!is_retryable(&UpstreamError::status(500, "status 500")));
        assert!(!is_retryable(&UpstreamError::rejected("bad image")));
        assert!(!is_retryable(&UpstreamError::misconfigured("JSON body")));
    }

    #[test]
    fn status_message_includes_a_compacted_body_preview() {
        let message = status_message(
            reqwest::StatusCode::BAD_GATEWAY,
            b"upstream\n  connect   error",
        );
        assert_eq!(message, "status 502: upstream connect error");
    }

    #[test]
    fn body_preview_truncates_long_bodies() {
        let preview = body_preview("x".repeat(400).as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }
}
