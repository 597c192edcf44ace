//! Format-dispatched decoding into RGB pixels.

use image::ImageFormat;

use super::PixelBuffer;
use crate::error::NamingError;
use crate::media::{ImageBuffer, MediaType};

/// Decoder used for a declared media type.
///
/// Anything not JPEG, PNG or WebP (GIF included) is tried as JPEG, since some
/// upstream sources mislabel or re-wrap JPEG frames.
#[must_use]
pub fn decoder_format(media_type: &MediaType) -> ImageFormat {
    match media_type {
        MediaType::Png => ImageFormat::Png,
        MediaType::Webp => ImageFormat::WebP,
        MediaType::Jpeg | MediaType::Other(_) => ImageFormat::Jpeg,
    }
}

/// Decode an upload into an RGB [`PixelBuffer`].
///
/// # Errors
///
/// Returns `Decode` for corrupt data or unsupported sub-formats.
pub fn decode(buffer: &ImageBuffer) -> Result<PixelBuffer, NamingError> {
    let media_type = buffer.media_type();
    let format = decoder_format(media_type);

    let img = image::load_from_memory_with_format(buffer.data(), format).map_err(|e| {
        tracing::warn!(media_type = %media_type, error = %e, "failed to decode image");
        NamingError::Decode { media_type: media_type.to_string(), message: e.to_string() }
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(NamingError::Decode {
            media_type: media_type.to_string(),
            message: "image has zero-sized dimension".to_string(),
        });
    }

    let pixels = PixelBuffer::from_rgb(img.to_rgb8());
    tracing::debug!(width = pixels.width(), height = pixels.height(), ?format, "decoded");
    Ok(pixels)
}
