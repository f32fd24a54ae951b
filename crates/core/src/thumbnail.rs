//! JPEG thumbnail rendering for uploaded photos.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ExtendedColorType;

use crate::error::CoreError;

pub const DEFAULT_THUMB_WIDTH: u32 = 300;
pub const DEFAULT_THUMB_QUALITY: u8 = 80;

/// Largest edge a baseline JPEG can carry.
pub const MAX_THUMB_EDGE: u32 = 65_535;
/// Upper bound on thumbnail area, checked before any pixel buffer is allocated.
pub const MAX_THUMB_PIXELS: u64 = 24_000_000;

/// Target size and encoding quality for thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSpec {
    /// Output width in pixels. Height follows the source aspect ratio.
    pub width: u32,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

impl Default for ThumbnailSpec {
    fn default() -> Self {
        Self {
            width: DEFAULT_THUMB_WIDTH,
            quality: DEFAULT_THUMB_QUALITY,
        }
    }
}

impl ThumbnailSpec {
    /// Height for a source of `src_width` x `src_height`, never below 1.
    pub fn height_for(&self, src_width: u32, src_height: u32) -> u32 {
        if src_width == 0 {
            return 1;
        }
        let scaled = (u64::from(src_height) * u64::from(self.width) + u64::from(src_width) / 2)
            / u64::from(src_width);
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    }

    /// Reject output sizes the encoder cannot represent or that would not fit in memory.
    pub fn check_output(&self, height: u32) -> Result<(), CoreError> {
        let pixels = u64::from(self.width) * u64::from(height);
        if self.width > MAX_THUMB_EDGE || height > MAX_THUMB_EDGE || pixels > MAX_THUMB_PIXELS {
            return Err(CoreError::Validation(format!(
                "Image proportions too extreme for a thumbnail ({}x{height})",
                self.width
            )));
        }
        Ok(())
    }
}

/// Decode an uploaded image and render its thumbnail as JPEG bytes.
///
/// Smaller sources are scaled up to the target width.
pub fn render_thumbnail(bytes: &[u8], spec: ThumbnailSpec) -> Result<Vec<u8>, CoreError> {
    let source = image::load_from_memory(bytes)
        .map_err(|e| CoreError::Validation(format!("Unsupported image: {e}")))?;

    let height = spec.height_for(source.width(), source.height());
    spec.check_output(height)?;
    let resized = source
        .resize_exact(spec.width, height, FilterType::Lanczos3)
        .to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, spec.quality.clamp(1, 100))
        .encode(
            resized.as_raw(),
            resized.width(),
            resized.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CoreError::Internal(format!("Thumbnail encoding failed: {e}")))?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, RgbImage};

    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn height_follows_aspect_ratio() {
        let spec = ThumbnailSpec::default();
        assert_eq!(spec.height_for(600, 400), 200);
        assert_eq!(spec.height_for(900, 1), 1);
        assert_eq!(spec.height_for(0, 10), 1);
    }

    #[test]
    fn renders_jpeg_at_target_width() {
        let thumb = render_thumbnail(&png(600, 400), ThumbnailSpec::default()).unwrap();

        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Jpeg);
        assert_eq!(decoded.width(), 300);
        assert_eq!(decoded.height(), 200);
    }

    #[test]
    fn small_images_are_scaled_up() {
        let spec = ThumbnailSpec {
            width: 40,
            quality: 90,
        };
        let thumb = render_thumbnail(&png(20, 10), spec).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }

    #[test]
    fn tall_narrow_images_are_rejected_before_resizing() {
        let spec = ThumbnailSpec::default();
        assert_eq!(spec.height_for(1, 300), 90_000);
        assert_eq!(spec.height_for(1, 20_000), 6_000_000);

        for height in [300, 20_000] {
            let result = render_thumbnail(&png(1, height), spec);
            assert!(
                matches!(result, Err(CoreError::Validation(_))),
                "1x{height} should be a validation error, got {result:?}"
            );
        }
    }

    #[test]
    fn output_limits() {
        let spec = ThumbnailSpec::default();
        assert!(spec.check_output(MAX_THUMB_EDGE).is_ok());
        assert!(spec.check_output(MAX_THUMB_EDGE + 1).is_err());

        let wide = ThumbnailSpec {
            width: 10_000,
            quality: 80,
        };
        assert!(wide.check_output(2_400).is_ok());
        assert!(wide.check_output(2_401).is_err());
    }

    #[test]
    fn garbage_input_is_rejected() {
        let result = render_thumbnail(b"definitely not an image", ThumbnailSpec::default());
        assert!(matches!(result, Err(CoreError::Validation(_))));
    }
}
