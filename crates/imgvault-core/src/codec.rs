//! Codec adapter over the `image` and `imageproc` crates.
//!
//! This is the only place untrusted bytes are interpreted. Decoding never
//! errors to the caller: undecodable input simply yields no image.

use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgba};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use std::io::Cursor;

use crate::error::TransformError;
use crate::format::ImageFormatKind;

/// Fill for corners exposed by an arbitrary-angle rotation.
const ROTATION_FILL: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Decode an in-memory payload, detecting the format from its content.
///
/// Returns `None` for anything that is not a decodable image.
pub fn decode(bytes: &[u8]) -> Option<DynamicImage> {
    let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => {
            tracing::debug!("Cannot detect image format: {e}");
            return None;
        }
    };
    match reader.decode() {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::debug!("Decode failed: {e}");
            None
        }
    }
}

/// Encode an image to one of the supported formats.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first. GIF is
/// encoded from RGBA; float images are narrowed to 8 bits for PNG.
pub fn encode(image: &DynamicImage, format: ImageFormatKind) -> Result<Vec<u8>, TransformError> {
    let prepared = match format {
        ImageFormatKind::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        ImageFormatKind::Gif => DynamicImage::ImageRgba8(image.to_rgba8()),
        ImageFormatKind::Png => match image {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba8(image.to_rgba8())
            }
            other => other.clone(),
        },
    };

    let mut buffer = Cursor::new(Vec::new());
    prepared
        .write_to(&mut buffer, format.image_format())
        .map_err(|e| TransformError::Encode {
            format: format.to_string(),
            message: e.to_string(),
        })?;
    Ok(buffer.into_inner())
}

/// Stretch an image to exactly `width` x `height`. Aspect ratio is not kept.
pub fn resize_exact(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize_exact(width, height, FilterType::Triangle)
}

/// Rotate counter-clockwise by `degrees`, any integer accepted.
///
/// Quarter turns are lossless and swap the dimensions where appropriate. Any
/// other angle rotates about the center on the original canvas, leaving the
/// exposed corners transparent.
pub fn rotate_ccw(image: &DynamicImage, degrees: i64) -> DynamicImage {
    match degrees.rem_euclid(360) {
        0 => image.clone(),
        // `image` rotates clockwise
        90 => image.rotate270(),
        180 => image.rotate180(),
        270 => image.rotate90(),
        other => {
            let theta = -(other as f32).to_radians();
            let rgba = image.to_rgba8();
            DynamicImage::ImageRgba8(rotate_about_center(
                &rgba,
                theta,
                Interpolation::Bilinear,
                ROTATION_FILL,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn sample(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([155, 0, 0])))
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(decode(b"123").is_none());
        assert!(decode(&[]).is_none());
    }

    #[test]
    fn test_encode_decode_png() {
        let bytes = encode(&sample(12, 7), ImageFormatKind::Png).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (12, 7));
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let rgba = DynamicImage::new_rgba8(8, 8);
        let bytes = encode(&rgba, ImageFormatKind::Jpeg).unwrap();
        assert_eq!(&bytes[0..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_encode_gif_header() {
        let bytes = encode(&sample(4, 4), ImageFormatKind::Gif).unwrap();
        assert_eq!(&bytes[0..4], b"GIF8");
    }

    #[test]
    fn test_resize_exact_ignores_aspect_ratio() {
        let resized = resize_exact(&sample(300, 300), 100, 50);
        assert_eq!(resized.dimensions(), (100, 50));
    }

    #[test]
    fn test_rotate_quarter_turns() {
        let img = sample(40, 10);
        assert_eq!(rotate_ccw(&img, 0).dimensions(), (40, 10));
        assert_eq!(rotate_ccw(&img, 90).dimensions(), (10, 40));
        assert_eq!(rotate_ccw(&img, 180).dimensions(), (40, 10));
        assert_eq!(rotate_ccw(&img, -90).dimensions(), (10, 40));
        assert_eq!(rotate_ccw(&img, 450).dimensions(), (10, 40));
        assert_eq!(rotate_ccw(&img, 360).dimensions(), (40, 10));
    }

    #[test]
    fn test_rotate_ccw_direction() {
        // Mark the top-right pixel; a CCW quarter turn moves it to the top-left.
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 0, Rgb([255, 255, 255]));
        let rotated = rotate_ccw(&DynamicImage::ImageRgb8(img), 90).to_rgb8();
        assert_eq!(rotated.dimensions(), (2, 3));
        assert_eq!(rotated.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_rotate_arbitrary_angle_keeps_canvas() {
        let rotated = rotate_ccw(&sample(30, 20), 45);
        assert_eq!(rotated.dimensions(), (30, 20));
        // Corners fall outside the rotated source and are left transparent
        assert_eq!(rotated.to_rgba8().get_pixel(0, 0), &ROTATION_FILL);
    }
}
