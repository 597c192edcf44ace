//! End-to-end naming of one upload.
//!
//! ```text
//! ImageBuffer ──▶ summarize ──▶ data URI ──▶ retry(request_name) ──▶ Option<slug>
//! ```
//!
//! Every failure ends in `None`; the caller then applies its fallback scheme.

use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::error::NamingError;
use crate::media::ImageBuffer;
use crate::ports::{NamingRequest, VisionNamer};
use crate::retry::request_name_with_retry;
use crate::thumbnail::{summarize, CompressionStrategy, EncodedCandidate, ThumbnailConfig};
use crate::transport::to_data_uri;

/// Name an uploaded image with the vision API, or `None` to fall back.
///
/// The summary image is prepared once; retries reuse it.
pub async fn name_image(
    buffer: &ImageBuffer,
    settings: &Settings,
    namer: &dyn VisionNamer,
    cancel: &CancellationToken,
) -> Option<String> {
    let naming = &settings.naming;
    if !naming.enabled {
        tracing::debug!("AI naming disabled");
        return None;
    }

    tracing::info!(
        bytes = buffer.len(),
        media_type = %buffer.media_type(),
        model = %naming.model,
        "AI naming started"
    );

    let data_uri = match prepare_payload(buffer, settings) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(kind = e.kind(), error = %e, "no summary image; skipping AI naming");
            return None;
        }
    };

    let request = NamingRequest::new(naming.model.as_str(), naming.prompt.as_str(), data_uri);
    let name =
        request_name_with_retry(namer, &request, naming.timeout, naming.max_retries, cancel).await;
    if name.is_none() {
        tracing::info!(fallback = naming.fallback_name_type.as_str(), "AI naming produced no name");
    }
    name
}

/// Build the data URI sent to the vision API.
///
/// When the source cannot be decoded, the original bytes are sent instead,
/// but only if `max_image_size` is unset or the source fits within it, and
/// under quality search only if the source already fits `max_bytes`. Encoder
/// failures, including an unmet byte budget, are never papered over.
/// Above that limit compression is mandatory, so `passthrough` is promoted to
/// quality search.
///
/// # Errors
///
/// Returns `InvalidArgument` for an empty buffer, `EncodeBudgetExceeded` when
/// quality search cannot meet its ceiling, or the decode error when the
/// original is too large to send as-is.
pub fn prepare_payload(buffer: &ImageBuffer, settings: &Settings) -> Result<String, NamingError> {
    if buffer.is_empty() {
        return Err(NamingError::InvalidArgument("image buffer is empty".to_string()));
    }

    let within_limit = settings
        .naming
        .max_image_size
        .map_or(true, |limit| buffer.len() as u64 <= limit);

    let promoted;
    let thumbnail = if !within_limit
        && settings.thumbnail.strategy == CompressionStrategy::Passthrough
    {
        tracing::debug!(bytes = buffer.len(), "source over size limit; compression required");
        promoted = ThumbnailConfig {
            strategy: CompressionStrategy::QualitySearch,
            ..settings.thumbnail.clone()
        };
        &promoted
    } else {
        &settings.thumbnail
    };

    // Quality search promises a payload under `max_bytes`; the original may
    // stand in only if it keeps that promise.
    let fits_budget = thumbnail.strategy != CompressionStrategy::QualitySearch
        || buffer.len() <= thumbnail.max_bytes;

    let candidate = match summarize(buffer, thumbnail) {
        Ok(candidate) => candidate,
        Err(e @ NamingError::Decode { .. }) if within_limit && fits_budget => {
            tracing::warn!(
                kind = e.kind(),
                error = %e,
                "source not decodable, using original image"
            );
            EncodedCandidate {
                bytes: buffer.data().to_vec(),
                media_type: buffer.media_type().clone(),
                quality: None,
            }
        }
        Err(e) => return Err(e),
    };

    tracing::debug!(
        original_bytes = buffer.len(),
        bytes = candidate.bytes.len(),
        quality = ?candidate.quality,
        "summary image ready"
    );
    to_data_uri(&candidate.bytes, candidate.media_type.as_mime())
}
