//! Bounded-size image summaries for the vision API.
//!
//! ```text
//! ImageBuffer ──▶ decode ──▶ resample ──▶ encode ──▶ EncodedCandidate
//!  (bytes+mime)   (pixels)   (≤ max dim)  (JPEG ≤ budget)
//! ```
//!
//! The encode stage is selected by [`CompressionStrategy`]; `passthrough`
//! skips every stage and forwards the original bytes.

pub mod decode;
pub mod encode;
pub mod resample;

use serde::Deserialize;

use crate::error::NamingError;
use crate::media::{ImageBuffer, MediaType};

pub use decode::decode;
pub use encode::{encode_jpeg, encode_with_strategy};
pub use resample::resample_to_fit;

/// Default bound for the longest edge of the summary image.
pub const DEFAULT_MAX_DIMENSION: u32 = 512;
/// Quality used by the fixed thumbnail strategy.
pub const DEFAULT_THUMBNAIL_QUALITY: u8 = 40;
/// Default byte ceiling for the quality-search strategy (4 MiB).
pub const DEFAULT_MAX_BYTES: usize = 4 * 1024 * 1024;

/// Decoded pixels, interleaved, row-major.
///
/// `width * height * channels == data.len()` always holds and both
/// dimensions are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Build a pixel buffer, validating dimensions against the data length.
    ///
    /// Only grayscale (1) and RGB (3) layouts are accepted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a dimension is zero, the channel count is
    /// unsupported, or the data length does not match.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, NamingError> {
        if width == 0 || height == 0 {
            return Err(NamingError::InvalidArgument(format!(
                "pixel buffer dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if channels != 1 && channels != 3 {
            return Err(NamingError::InvalidArgument(format!(
                "unsupported channel count {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(NamingError::InvalidArgument(format!(
                "pixel data length {} does not match {width}x{height}x{channels} = {expected}",
                data.len()
            )));
        }
        Ok(Self { width, height, channels, data })
    }

    /// Wrap an RGB image from the `image` crate.
    #[must_use]
    pub fn from_rgb(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height, channels: 3, data: img.into_raw() }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channels per pixel.
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Raw interleaved samples.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Longest edge.
    #[must_use]
    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// One encoding attempt's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCandidate {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Media type of `bytes`.
    pub media_type: MediaType,
    /// Encoder quality used, `None` when the bytes were not re-encoded.
    pub quality: Option<u8>,
}

/// How the summary image is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompressionStrategy {
    /// Resample and encode once at a fixed low quality.
    #[default]
    Thumbnail,
    /// Resample, then step quality down until the output fits `max_bytes`.
    QualitySearch,
    /// Send the original bytes untouched.
    Passthrough,
}

impl std::str::FromStr for CompressionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumbnail" => Ok(Self::Thumbnail),
            "quality-search" => Ok(Self::QualitySearch),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!(
                "Unsupported strategy '{other}'. Valid: thumbnail, quality-search, passthrough"
            )),
        }
    }
}

/// Settings for the summary image.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Encode strategy.
    pub strategy: CompressionStrategy,
    /// Longest edge after resampling.
    pub max_dimension: u32,
    /// Quality for [`CompressionStrategy::Thumbnail`].
    pub quality: u8,
    /// First quality tried by [`CompressionStrategy::QualitySearch`].
    pub start_quality: u8,
    /// Last quality tried by [`CompressionStrategy::QualitySearch`].
    pub min_quality: u8,
    /// Distance between quality steps.
    pub quality_step: u8,
    /// Byte ceiling for [`CompressionStrategy::QualitySearch`].
    pub max_bytes: usize,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            strategy: CompressionStrategy::Thumbnail,
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_THUMBNAIL_QUALITY,
            start_quality: 60,
            min_quality: 10,
            quality_step: 10,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Produce the network-bound representation of an upload.
///
/// # Errors
///
/// Returns `Decode` when the source cannot be decoded, `EncodeBudgetExceeded`
/// when quality search cannot meet the ceiling, or `Encode` on encoder failure.
pub fn summarize(
    buffer: &ImageBuffer,
    config: &ThumbnailConfig,
) -> Result<EncodedCandidate, NamingError> {
    if config.strategy == CompressionStrategy::Passthrough {
        tracing::debug!(
            bytes = buffer.len(),
            media_type = %buffer.media_type(),
            "passthrough, no re-encode"
        );
        return Ok(EncodedCandidate {
            bytes: buffer.data().to_vec(),
            media_type: buffer.media_type().clone(),
            quality: None,
        });
    }

    let pixels = decode(buffer)?;
    let pixels = resample_to_fit(pixels, config.max_dimension)?;
    encode_with_strategy(&pixels, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        encode_jpeg(&PixelBuffer::from_rgb(img), 90).unwrap()
    }

    #[test]
    fn pixel_buffer_rejects_mismatched_length() {
        assert!(PixelBuffer::new(2, 2, 3, vec![0; 11]).is_err());
        assert!(PixelBuffer::new(0, 2, 3, vec![]).is_err());
        assert!(PixelBuffer::new(2, 2, 4, vec![0; 16]).is_err());
        assert!(PixelBuffer::new(2, 2, 3, vec![0; 12]).is_ok());
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!("thumbnail".parse::<CompressionStrategy>(), Ok(CompressionStrategy::Thumbnail));
        assert_eq!(
            "quality-search".parse::<CompressionStrategy>(),
            Ok(CompressionStrategy::QualitySearch)
        );
        assert_eq!(
            "passthrough".parse::<CompressionStrategy>(),
            Ok(CompressionStrategy::Passthrough)
        );
        assert!("mozjpeg".parse::<CompressionStrategy>().is_err());
    }

    #[test]
    fn summarize_thumbnail_bounds_dimensions() {
        let source = ImageBuffer::new(jpeg_fixture(1200, 800), MediaType::Jpeg);
        let out = summarize(&source, &ThumbnailConfig::default()).unwrap();
        assert_eq!(out.media_type, MediaType::Jpeg);
        assert_eq!(out.quality, Some(DEFAULT_THUMBNAIL_QUALITY));

        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (512, 341));
    }

    #[test]
    fn summarize_passthrough_keeps_original_bytes() {
        let bytes = vec![1, 2, 3, 4];
        let source = ImageBuffer::new(bytes.clone(), MediaType::Other("image/gif".into()));
        let config =
            ThumbnailConfig { strategy: CompressionStrategy::Passthrough, ..Default::default() };
        let out = summarize(&source, &config).unwrap();
        assert_eq!(out.bytes, bytes);
        assert_eq!(out.media_type.as_mime(), "image/gif");
        assert_eq!(out.quality, None);
    }

    #[test]
    fn summarize_corrupt_input_is_decode_error() {
        let source = ImageBuffer::new(vec![0xFF, 0xD8, 0x00], MediaType::Jpeg);
        let err = summarize(&source, &ThumbnailConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
