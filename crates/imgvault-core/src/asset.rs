//! Asset records: the canonical entity, its persisted layout and its wire view.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A stored image plus its immutable metadata.
///
/// Created once by an upload and never mutated afterwards. Conversions and
/// transforms produce new, unpersisted byte blobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// Opaque unique identifier (UUID v4), the sole lookup key
    pub id: String,

    /// Uploaded payload, verbatim
    pub raw_bytes: Vec<u8>,

    /// Uppercased content-type subtype ("JPEG", "PNG", ...)
    pub declared_format: String,

    /// MIME string mirroring `declared_format`
    pub content_type: String,

    /// Length of `raw_bytes` at creation
    pub size_bytes: u64,

    /// Caller network address
    pub origin_host: String,

    /// Creation time (UTC)
    pub created_at: DateTime<Utc>,
}

impl ImageAsset {
    /// Build a new asset with a fresh id and the current time.
    pub fn new(raw_bytes: Vec<u8>, declared_format: String, origin_host: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content_type: format!("image/{}", declared_format.to_lowercase()),
            size_bytes: raw_bytes.len() as u64,
            raw_bytes,
            declared_format,
            origin_host,
            created_at: Utc::now(),
        }
    }

    /// Persisted document for this asset.
    pub fn to_record(&self) -> AssetRecord {
        AssetRecord {
            id: self.id.clone(),
            data: BASE64.encode(&self.raw_bytes),
            content_type: self.content_type.clone(),
            format: self.declared_format.clone(),
            size: self.size_bytes,
            host: self.origin_host.clone(),
            upload_time: self.created_at,
        }
    }

    /// Client-facing view; `host` is never exposed.
    pub fn view(&self) -> AssetView {
        AssetView {
            id: self.id.clone(),
            data: BASE64.encode(&self.raw_bytes),
            content_type: self.content_type.clone(),
            format: self.declared_format.clone(),
            size: self.size_bytes,
            upload_time: self.created_at,
        }
    }
}

/// One document per asset, keyed by `id`, with base64-encoded `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub data: String,
    pub content_type: String,
    pub format: String,
    pub size: u64,
    pub host: String,
    pub upload_time: DateTime<Utc>,
}

impl TryFrom<AssetRecord> for ImageAsset {
    type Error = StoreError;

    fn try_from(record: AssetRecord) -> Result<Self, Self::Error> {
        let raw_bytes = BASE64.decode(record.data.as_bytes()).map_err(|e| {
            StoreError::Backend(format!("corrupt document {}: {e}", record.id))
        })?;
        Ok(Self {
            id: record.id,
            raw_bytes,
            declared_format: record.format,
            content_type: record.content_type,
            size_bytes: record.size,
            origin_host: record.host,
            created_at: record.upload_time,
        })
    }
}

/// Asset as returned by `GET /images/{id}`.
///
/// When a conversion was requested, `data` and `content_type` describe the
/// converted bytes while the other fields still describe the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetView {
    pub id: String,
    pub data: String,
    pub content_type: String,
    pub format: String,
    pub size: u64,
    pub upload_time: DateTime<Utc>,
}

impl AssetView {
    /// Decode the base64 payload.
    pub fn bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(self.data.as_bytes())
    }
}

/// Base64-encode bytes for the JSON wire format.
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}
