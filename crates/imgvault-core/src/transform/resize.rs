//! Resizing to exact target dimensions.

use crate::codec;
use crate::error::{TransformError, TransformResult};

use super::ImageHandle;

/// Stretch to `width` x `height` and re-encode in the handle's format.
///
/// Both dimensions must be positive; aspect ratio is not preserved.
pub fn resize(handle: &ImageHandle, width: i64, height: i64) -> TransformResult {
    let image = handle.image()?;
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(TransformError::InvalidDimensions { width, height }),
    };
    let resized = codec::resize_exact(image, w, h);
    handle.produce_bytes(Some(&resized), None)
}
