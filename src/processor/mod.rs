use image::{load_from_memory, DynamicImage};

pub mod thumbnail;

/// Decodes a raw byte buffer into a structured image, guessing the
/// format from the magic bytes.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, image::ImageError> {
    load_from_memory(data)
}
