use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::config::ThumbnailConfig;

/// Produces a thumbnail bounded to the configured maximum dimensions.
///
/// The aspect ratio of the original is always preserved and images
/// already within the bounds are never upscaled. The output is always
/// encoded as JPEG regardless of the input format, so downstream
/// consumers can assume a single content type for all thumbnails.
pub fn derive_thumbnail(img: &DynamicImage, cfg: &ThumbnailConfig) -> anyhow::Result<Bytes> {
    let (width, height) = img.dimensions();

    let bounded = if width > cfg.max_width || height > cfg.max_height {
        img.resize(cfg.max_width, cfg.max_height, cfg.filter.into())
    } else {
        img.clone()
    };

    // JPEG has no alpha channel, flatten before encoding.
    let flattened = DynamicImage::ImageRgb8(bounded.to_rgb8());

    let mut buff = Cursor::new(Vec::new());
    flattened.write_to(&mut buff, ImageFormat::Jpeg)?;

    Ok(Bytes::from(buff.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
    }

    fn derived_dimensions(width: u32, height: u32) -> (u32, u32) {
        let cfg = ThumbnailConfig::default();
        let encoded = derive_thumbnail(&blank_image(width, height), &cfg).expect("derive");
        let decoded = crate::processor::decode_image(&encoded).expect("decode thumbnail");
        decoded.dimensions()
    }

    #[test]
    fn test_wide_image_is_bounded_preserving_aspect() {
        assert_eq!(derived_dimensions(400, 100), (200, 50));
    }

    #[test]
    fn test_tall_image_is_bounded_preserving_aspect() {
        assert_eq!(derived_dimensions(100, 400), (50, 200));
    }

    #[test]
    fn test_small_image_is_never_upscaled() {
        assert_eq!(derived_dimensions(50, 50), (50, 50));
    }

    #[test]
    fn test_image_at_bounds_is_unchanged() {
        assert_eq!(derived_dimensions(200, 200), (200, 200));
    }

    #[test]
    fn test_output_is_jpeg() {
        let cfg = ThumbnailConfig::default();
        let encoded = derive_thumbnail(&blank_image(300, 300), &cfg).expect("derive");
        let format = image::guess_format(&encoded).expect("guess format");
        assert_eq!(format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(crate::processor::decode_image(b"definitely not an image").is_err());
    }
}
