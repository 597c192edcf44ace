//! JPEG encoding under a size budget.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{CompressionStrategy, EncodedCandidate, PixelBuffer, ThumbnailConfig};
use crate::error::NamingError;
use crate::media::MediaType;

/// Encode pixels to JPEG at `quality` (clamped to 1-100).
///
/// Output is deterministic: identical pixels and quality give identical bytes.
///
/// # Errors
///
/// Returns `Encode` if the encoder fails.
pub fn encode_jpeg(pixels: &PixelBuffer, quality: u8) -> Result<Vec<u8>, NamingError> {
    let color = match pixels.channels() {
        1 => ExtendedColorType::L8,
        _ => ExtendedColorType::Rgb8,
    };

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels.data(), pixels.width(), pixels.height(), color)
        .map_err(|e| NamingError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Quality steps from `start` down to `min` inclusive.
///
/// The last step is always `min`, even when `start - min` is not a multiple
/// of `step`. A zero step is treated as one.
#[must_use]
pub fn quality_steps(start: u8, min: u8, step: u8) -> Vec<u8> {
    let step = step.max(1);
    let mut steps = vec![start];
    let mut quality = start;
    while quality > min {
        quality = quality.saturating_sub(step).max(min);
        steps.push(quality);
    }
    steps
}

/// Encode pixels according to the configured strategy.
///
/// # Errors
///
/// Returns `EncodeBudgetExceeded` when quality search runs out of steps, or
/// `InvalidArgument` for the passthrough strategy, which has no pixel path.
pub fn encode_with_strategy(
    pixels: &PixelBuffer,
    config: &ThumbnailConfig,
) -> Result<EncodedCandidate, NamingError> {
    match config.strategy {
        CompressionStrategy::Thumbnail => encode_fixed(pixels, config.quality),
        CompressionStrategy::QualitySearch => search_quality(
            pixels,
            &quality_steps(config.start_quality, config.min_quality, config.quality_step),
            config.max_bytes,
        ),
        CompressionStrategy::Passthrough => Err(NamingError::InvalidArgument(
            "passthrough strategy does not re-encode pixels".to_string(),
        )),
    }
}

fn encode_fixed(pixels: &PixelBuffer, quality: u8) -> Result<EncodedCandidate, NamingError> {
    let bytes = encode_jpeg(pixels, quality)?;
    tracing::debug!(bytes = bytes.len(), quality, "encoded thumbnail");
    Ok(EncodedCandidate { bytes, media_type: MediaType::Jpeg, quality: Some(quality) })
}

/// Try each quality in order and return the first candidate within `max_bytes`.
fn search_quality(
    pixels: &PixelBuffer,
    steps: &[u8],
    max_bytes: usize,
) -> Result<EncodedCandidate, NamingError> {
    let mut smallest = usize::MAX;
    for &quality in steps {
        let bytes = encode_jpeg(pixels, quality)?;
        tracing::debug!(bytes = bytes.len(), quality, max_bytes, "quality step");
        if bytes.len() <= max_bytes {
            return Ok(EncodedCandidate { bytes, media_type: MediaType::Jpeg, quality: Some(quality) });
        }
        smallest = smallest.min(bytes.len());
    }

    tracing::warn!(max_bytes, smallest, "no quality step fits the byte budget");
    Err(NamingError::EncodeBudgetExceeded { max_bytes, smallest })
}
