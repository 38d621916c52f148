//! Uploaded photo handling: decode, bound to a thumbnail, re-encode.
//! Bad uploads are rejected as errors; they never reach the roster.

use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Longest edge of a stored thumbnail, in pixels.
pub const MAX_THUMB_DIMENSION: u32 = 200;

/// Turn a base64-encoded upload into the base64 PNG thumbnail stored on
/// the record. Aspect ratio is preserved; images already within bounds
/// are re-encoded but not resized.
pub fn thumbnail_from_base64(upload: &str) -> anyhow::Result<String> {
    let bytes = STANDARD
        .decode(upload.trim())
        .context("photo payload is not valid base64")?;
    let img = image::load_from_memory(&bytes).context("photo is not a decodable image")?;
    let thumb = shrink_to_bound(img, MAX_THUMB_DIMENSION);

    let mut buf = Cursor::new(Vec::new());
    thumb
        .write_to(&mut buf, ImageFormat::Png)
        .context("failed to encode thumbnail")?;
    Ok(STANDARD.encode(buf.get_ref()))
}

fn shrink_to_bound(img: DynamicImage, bound: u32) -> DynamicImage {
    if img.width() <= bound && img.height() <= bound {
        return img;
    }
    img.thumbnail(bound, bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_base64(width: u32, height: u32) -> String {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        STANDARD.encode(buf.get_ref())
    }

    fn decode_dims(thumb_base64: &str) -> (u32, u32) {
        let bytes = STANDARD.decode(thumb_base64).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn large_upload_is_bounded_with_aspect_kept() {
        let thumb = thumbnail_from_base64(&png_base64(400, 300)).unwrap();
        assert_eq!(decode_dims(&thumb), (200, 150));
    }

    #[test]
    fn small_upload_keeps_its_size() {
        let thumb = thumbnail_from_base64(&png_base64(120, 80)).unwrap();
        assert_eq!(decode_dims(&thumb), (120, 80));
    }

    #[test]
    fn tall_upload_is_bounded_on_height() {
        let thumb = thumbnail_from_base64(&png_base64(100, 400)).unwrap();
        assert_eq!(decode_dims(&thumb), (50, 200));
    }

    #[test]
    fn non_base64_payload_is_rejected() {
        assert!(thumbnail_from_base64("not//valid!!base64??").is_err());
    }

    #[test]
    fn non_image_payload_is_rejected() {
        let payload = STANDARD.encode(b"plain text, not pixels");
        assert!(thumbnail_from_base64(&payload).is_err());
    }

    #[test]
    fn thumbnail_output_is_png() {
        let thumb = thumbnail_from_base64(&png_base64(300, 300)).unwrap();
        let bytes = STANDARD.decode(&thumb).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
