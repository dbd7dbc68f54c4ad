//! Format conversion.

use crate::error::TransformResult;
use crate::format::ImageFormatKind;

use super::ImageHandle;

/// Case-insensitive whitelist check for a requested target format.
pub fn validate_format(token: &str) -> bool {
    ImageFormatKind::parse(token).is_some()
}

/// Re-encode the held image to `format`.
///
/// Callers validate user input with [`validate_format`] and parse it into an
/// [`ImageFormatKind`] first; an unknown token cannot reach the encoder.
pub fn convert_to(handle: &ImageHandle, format: ImageFormatKind) -> TransformResult {
    handle.produce_bytes(None, Some(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::error::TransformError;
    use crate::transform::test_support::{bmp_bytes, png_bytes};
    use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

    #[test]
    fn test_validate_format() {
        assert!(validate_format("jpeg"));
        assert!(validate_format("GiF"));
        assert!(!validate_format("webp"));
        assert!(!validate_format("jpg"));
    }

    #[test]
    fn test_png_to_gif_keeps_dimensions() {
        let handle = ImageHandle::from_bytes(&png_bytes(50, 50), Some(ImageFormatKind::Png));
        let gif = convert_to(&handle, ImageFormatKind::Gif).unwrap();
        assert_eq!(&gif[0..4], b"GIF8");
        assert_eq!(codec::decode(&gif).unwrap().dimensions(), (50, 50));
    }

    #[test]
    fn test_png_to_png_is_pixel_identical() {
        let source = png_bytes(20, 10);
        let handle = ImageHandle::from_bytes(&source, Some(ImageFormatKind::Png));
        let converted = convert_to(&handle, ImageFormatKind::Png).unwrap();
        assert_eq!(
            codec::decode(&converted).unwrap().to_rgba8(),
            codec::decode(&source).unwrap().to_rgba8()
        );
    }

    #[test]
    fn test_jpeg_to_jpeg_keeps_dimensions() {
        let handle = ImageHandle::from_bytes(&png_bytes(33, 17), None);
        let jpeg = convert_to(&handle, ImageFormatKind::Jpeg).unwrap();
        let again = ImageHandle::from_bytes(&jpeg, Some(ImageFormatKind::Jpeg));
        let round = convert_to(&again, ImageFormatKind::Jpeg).unwrap();
        assert_eq!(codec::decode(&round).unwrap().dimensions(), (33, 17));
    }

    #[test]
    fn test_gif_to_gif_is_pixel_identical() {
        // 256 distinct colors fill a full palette
        let img = RgbaImage::from_fn(16, 16, |x, y| {
            let i = (y * 16 + x) as u8;
            Rgba([i, 255 - i, i.wrapping_mul(7), 255])
        });
        let gif = codec::encode(&DynamicImage::ImageRgba8(img), ImageFormatKind::Gif).unwrap();

        let handle = ImageHandle::from_bytes(&gif, Some(ImageFormatKind::Gif));
        let again = convert_to(&handle, ImageFormatKind::Gif).unwrap();
        assert_eq!(
            codec::decode(&again).unwrap().to_rgba8(),
            codec::decode(&gif).unwrap().to_rgba8()
        );
    }

    #[test]
    fn test_bmp_source_converts_to_png() {
        let handle = ImageHandle::from_bytes(&bmp_bytes(3, 2), None);
        assert!(handle.is_valid());
        let png = convert_to(&handle, ImageFormatKind::Png).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert_eq!(codec::decode(&png).unwrap().dimensions(), (3, 2));
    }

    #[test]
    fn test_convert_undecodable_is_absent() {
        let handle = ImageHandle::from_bytes(b"not an image", None);
        assert_eq!(
            convert_to(&handle, ImageFormatKind::Png),
            Err(TransformError::NoImage)
        );
    }
}
