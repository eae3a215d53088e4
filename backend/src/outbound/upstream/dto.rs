//! Response classification for the processing webhook.
//!
//! The webhook is expected to answer a successful transform with the binary
//! image itself. Some misconfigured workflow nodes instead answer with a JSON
//! description of the file they produced, which the gateway must reject rather
//! than hand a JSON blob to the client as a poster.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::ports::{UpstreamArtifact, UpstreamError};

/// Content type assumed when the webhook omits the header on a binary body.
const DEFAULT_BINARY_CONTENT_TYPE: &str = "image/png";

/// Loose shape of JSON bodies the webhook is known to produce.
#[derive(Debug, Deserialize)]
pub(super) struct EnvelopeDto {
    error: Option<Value>,
    message: Option<String>,
    #[serde(rename = "fileExtension")]
    file_extension: Option<String>,
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    data: Option<Value>,
    image: Option<Value>,
}

/// Classify a successful webhook response into an artifact or a contract
/// violation.
///
/// Binary content types pass through untouched. JSON bodies are inspected:
/// an explicit error becomes a rejection, file metadata without payload means
/// the workflow's respond node is set to return metadata instead of binary
/// data, and anything else fails closed as a contract violation.
pub(super) fn classify_response(
    content_type: Option<&str>,
    body: Bytes,
) -> Result<UpstreamArtifact, UpstreamError> {
    let Some(declared) = content_type else {
        return Ok(UpstreamArtifact {
            content_type: DEFAULT_BINARY_CONTENT_TYPE.to_owned(),
            bytes: body,
        });
    };

    let essence = declared
        .parse::<mime::Mime>()
        .map(|parsed| parsed.essence_str().to_owned())
        .unwrap_or_else(|_| declared.trim().to_ascii_lowercase());

    if essence.starts_with("image/") || essence == mime::APPLICATION_OCTET_STREAM.essence_str() {
        return Ok(UpstreamArtifact {
            content_type: declared.to_owned(),
            bytes: body,
        });
    }

    if essence == mime::APPLICATION_JSON.essence_str() {
        return Err(classify_json_body(&body));
    }

    Err(UpstreamError::misconfigured(format!(
        "webhook answered with unexpected content type `{declared}`"
    )))
}

fn classify_json_body(body: &Bytes) -> UpstreamError {
    let Ok(envelope) = serde_json::from_slice::<EnvelopeDto>(body) else {
        return UpstreamError::misconfigured(
            "webhook answered with JSON that does not match any known shape",
        );
    };

    if envelope.error.is_some() || envelope.message.is_some() {
        // Blank messages count as absent; a rejection message must never be
        // empty or the error envelope cannot be built from it.
        let message = envelope
            .message
            .and_then(non_blank)
            .or_else(|| match envelope.error {
                Some(Value::String(text)) => non_blank(text),
                _ => None,
            })
            .unwrap_or_else(|| "webhook reported an error".to_owned());
        return UpstreamError::rejected(message);
    }

    let has_metadata = envelope.file_extension.is_some() || envelope.mime_type.is_some();
    let has_payload = envelope.data.is_some() || envelope.image.is_some();
    if has_metadata && !has_payload {
        return UpstreamError::misconfigured(
            "webhook returned file metadata instead of binary data; \
             set its respond node to return binary data",
        );
    }

    UpstreamError::misconfigured(
        "webhook answered with JSON where a binary image was expected",
    )
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
