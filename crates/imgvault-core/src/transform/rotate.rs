//! Rotation by an integer angle, in degrees counter-clockwise.

use crate::codec;
use crate::error::TransformResult;

use super::ImageHandle;

/// Rotate and re-encode in the handle's configured format.
pub fn rotate(handle: &ImageHandle, angle: i64) -> TransformResult {
    let rotated = codec::rotate_ccw(handle.image()?, angle);
    handle.produce_bytes(Some(&rotated), None)
}
