//! Transform handlers built on a single request-scoped [`ImageHandle`].
//!
//! - **convert**: re-encode to another whitelisted format
//! - **rotate**: counter-clockwise rotation by an integer angle
//! - **resize**: stretch to exact dimensions
//!
//! Every transform returns a [`TransformResult`]; a handle whose payload
//! failed to decode produces [`TransformError::NoImage`] instead of panicking.

pub mod convert;
pub mod resize;
pub mod rotate;

pub use convert::{convert_to, validate_format};
pub use resize::resize;
pub use rotate::rotate;

use image::{DynamicImage, GenericImageView};

use crate::codec;
use crate::error::{TransformError, TransformResult};
use crate::format::ImageFormatKind;

/// A decoded image (or the absence of one) plus its default output format.
///
/// Lives for one request and is consumed by exactly one transform.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    image: Option<DynamicImage>,
    format: ImageFormatKind,
}

impl ImageHandle {
    /// Decode raw bytes. Undecodable input yields an invalid handle.
    ///
    /// `format` is the default output format; `None` falls back to JPEG.
    pub fn from_bytes(bytes: &[u8], format: Option<ImageFormatKind>) -> Self {
        Self {
            image: codec::decode(bytes),
            format: format.unwrap_or_default(),
        }
    }

    /// Wrap an already-decoded image.
    pub fn from_image(image: DynamicImage, format: Option<ImageFormatKind>) -> Self {
        Self {
            image: Some(image),
            format: format.unwrap_or_default(),
        }
    }

    /// Whether a decoded image is present.
    pub fn is_valid(&self) -> bool {
        self.image.is_some()
    }

    /// Default output format of this handle.
    pub fn format(&self) -> ImageFormatKind {
        self.format
    }

    /// Pixel dimensions of the held image, if any.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }

    pub(crate) fn image(&self) -> Result<&DynamicImage, TransformError> {
        self.image.as_ref().ok_or(TransformError::NoImage)
    }

    /// Encode `image` (or the held image) in `format` (or the handle's format).
    pub fn produce_bytes(
        &self,
        image: Option<&DynamicImage>,
        format: Option<ImageFormatKind>,
    ) -> TransformResult {
        let image = match image {
            Some(image) => image,
            None => self.image()?,
        };
        codec::encode(image, format.unwrap_or(self.format))
    }
}
