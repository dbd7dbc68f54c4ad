//! Image format tokens and content-type handling.
//!
//! `ImageFormatKind` is the conversion whitelist. Adding a target format is a
//! matter of adding a variant here; nothing in the wire protocol changes.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formats the services are able to encode to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormatKind {
    Gif,
    #[default]
    Jpeg,
    Png,
}

impl ImageFormatKind {
    /// Every supported target, in listing order.
    pub const ALL: [ImageFormatKind; 3] = [Self::Gif, Self::Jpeg, Self::Png];

    /// Parse a format token (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GIF" => Some(Self::Gif),
            "JPEG" => Some(Self::Jpeg),
            "PNG" => Some(Self::Png),
            _ => None,
        }
    }

    /// Canonical uppercase token, as stored in asset records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gif => "GIF",
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
        }
    }

    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Encoder selector for the `image` crate.
    pub fn image_format(&self) -> ImageFormat {
        match self {
            Self::Gif => ImageFormat::Gif,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }

    /// Comma-separated list of supported tokens, for error messages.
    pub fn listing() -> String {
        Self::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ImageFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the declared format token from an upload's `Content-Type`.
///
/// Returns `None` unless the header is `image/<subtype>` with a non-empty
/// subtype. Parameters (`; charset=...`) are ignored and the subtype is
/// uppercased, so `image/svg+xml` becomes `SVG+XML`.
pub fn declared_format(content_type: Option<&str>) -> Option<String> {
    let essence = content_type?.split(';').next()?.trim();
    let (kind, subtype) = essence.split_once('/')?;
    if !kind.trim().eq_ignore_ascii_case("image") {
        return None;
    }
    let subtype = subtype.trim();
    if subtype.is_empty() {
        return None;
    }
    Some(subtype.to_uppercase())
}
