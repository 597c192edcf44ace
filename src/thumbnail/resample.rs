//! Proportional downscaling to a longest-edge bound.

use image::imageops::FilterType;
use image::{GrayImage, RgbImage};

use super::PixelBuffer;
use crate::error::NamingError;

/// Target dimensions for fitting `(width, height)` inside `max_dimension`.
///
/// Returns the input unchanged when it already fits; never upscales.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }
    let scale = f64::from(max_dimension) / f64::from(longest);
    let scaled = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Downscale `pixels` so the longest edge is at most `max_dimension`.
///
/// Uses a triangle (bilinear) filter; legibility matters more than fidelity.
///
/// # Errors
///
/// Returns `InvalidArgument` when `max_dimension` is zero.
pub fn resample_to_fit(pixels: PixelBuffer, max_dimension: u32) -> Result<PixelBuffer, NamingError> {
    if max_dimension == 0 {
        return Err(NamingError::InvalidArgument("max_dimension must be non-zero".to_string()));
    }

    let (width, height) = fit_dimensions(pixels.width, pixels.height, max_dimension);
    if (width, height) == (pixels.width, pixels.height) {
        return Ok(pixels);
    }

    let PixelBuffer { width: src_w, height: src_h, channels, data } = pixels;
    let resized = match channels {
        1 => {
            let src = GrayImage::from_raw(src_w, src_h, data).ok_or_else(layout_error)?;
            image::imageops::resize(&src, width, height, FilterType::Triangle).into_raw()
        }
        _ => {
            let src = RgbImage::from_raw(src_w, src_h, data).ok_or_else(layout_error)?;
            image::imageops::resize(&src, width, height, FilterType::Triangle).into_raw()
        }
    };

    tracing::debug!(from_width = src_w, from_height = src_h, width, height, "resampled");
    PixelBuffer::new(width, height, channels, resized)
}

fn layout_error() -> NamingError {
    NamingError::InvalidArgument("pixel data does not match its dimensions".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::from_rgb(RgbImage::from_pixel(width, height, image::Rgb([9, 99, 199])))
    }

    #[test]
    fn landscape_scales_to_bound() {
        assert_eq!(fit_dimensions(3000, 2000, 512), (512, 341));
    }

    #[test]
    fn portrait_scales_to_bound() {
        assert_eq!(fit_dimensions(1000, 4000, 512), (128, 512));
    }

    #[test]
    fn within_bound_passes_through() {
        assert_eq!(fit_dimensions(512, 100, 512), (512, 100));
        assert_eq!(fit_dimensions(20, 30, 512), (20, 30));
    }

    #[test]
    fn extreme_aspect_keeps_minimum_of_one() {
        assert_eq!(fit_dimensions(10_000, 3, 512), (512, 1));
    }

    #[test]
    fn resample_never_upscales() {
        let small = solid(64, 48);
        let out = resample_to_fit(small.clone(), 512).unwrap();
        assert_eq!(out, small);
    }

    #[test]
    fn resample_downscales_pixels() {
        let out = resample_to_fit(solid(1024, 256), 512).unwrap();
        assert_eq!((out.width(), out.height()), (512, 128));
        assert_eq!(out.data().len(), 512 * 128 * 3);
        assert_eq!(&out.data()[..3], &[9, 99, 199]);
    }

    #[test]
    fn resample_grayscale() {
        let gray = PixelBuffer::new(100, 50, 1, vec![77; 5000]).unwrap();
        let out = resample_to_fit(gray, 10).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (10, 5, 1));
    }

    #[test]
    fn zero_bound_is_rejected() {
        assert!(resample_to_fit(solid(4, 4), 0).is_err());
    }
}
