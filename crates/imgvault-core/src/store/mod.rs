//! Asset store: canonical records over a pluggable document backend.
//!
//! The store is append/read-only with respect to existing records. `upload`
//! is the only mutating operation; `get` may convert on the fly but never
//! writes the result back.

mod file;
mod memory;

pub use file::FileDocumentStore;
pub use memory::MemoryDocumentStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::asset::{encode_base64, AssetRecord, AssetView, ImageAsset};
use crate::config::{BackendKind, Config, LimitsConfig};
use crate::error::{StoreError, UploadError};
use crate::format::{self, ImageFormatKind};
use crate::transform::{self, ImageHandle};

/// Key-value persistence for asset documents.
///
/// Implementations provide atomic single-document insert and lookup. Uses
/// `async_trait` so the store can hold an `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Persist a new document.
    async fn insert(&self, record: AssetRecord) -> Result<(), StoreError>;

    /// Look a document up by id.
    async fn find(&self, id: &str) -> Result<Option<AssetRecord>, StoreError>;
}

/// Creates the configured document backend.
pub struct DocumentStoreFactory;

impl DocumentStoreFactory {
    pub async fn create(config: &Config) -> Result<Arc<dyn DocumentStore>, StoreError> {
        match config.storage.backend {
            BackendKind::Memory => Ok(Arc::new(MemoryDocumentStore::new())),
            BackendKind::File => {
                let store = FileDocumentStore::open(config.data_dir()).await?;
                Ok(Arc::new(store))
            }
        }
    }
}

/// Owns asset records and implements upload and retrieval.
#[derive(Clone)]
pub struct AssetStore {
    backend: Arc<dyn DocumentStore>,
    limits: LimitsConfig,
}

impl AssetStore {
    pub fn new(backend: Arc<dyn DocumentStore>, limits: LimitsConfig) -> Self {
        Self { backend, limits }
    }

    /// Accept an upload and return the new asset id.
    ///
    /// The content type must be `image/<subtype>` and the body non-empty.
    /// The bytes are stored verbatim; they are not decoded here.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: Option<&str>,
        origin_host: &str,
    ) -> Result<String, UploadError> {
        let declared = format::declared_format(content_type).ok_or(UploadError::NotAnImage)?;
        if bytes.is_empty() {
            return Err(UploadError::EmptyBody);
        }
        if bytes.len() as u64 > self.limits.max_upload_bytes() {
            return Err(UploadError::TooLarge {
                max_mb: self.limits.max_upload_size_mb,
            });
        }

        let asset = ImageAsset::new(bytes, declared, origin_host.to_string());
        self.backend.insert(asset.to_record()).await?;
        tracing::info!(
            id = %asset.id,
            format = %asset.declared_format,
            size = asset.size_bytes,
            backend = self.backend.name(),
            "Stored image"
        );
        Ok(asset.id)
    }

    /// Look an asset up, optionally converting it to `requested_format`.
    ///
    /// An empty token means no conversion. The persisted record is never
    /// modified; a conversion only changes the returned view.
    pub async fn get(
        &self,
        id: &str,
        requested_format: Option<&str>,
    ) -> Result<AssetView, StoreError> {
        let record = self.backend.find(id).await?.ok_or(StoreError::NotFound)?;
        let asset = ImageAsset::try_from(record)?;
        let mut view = asset.view();

        let Some(token) = requested_format.filter(|t| !t.is_empty()) else {
            return Ok(view);
        };
        let Some(target) = ImageFormatKind::parse(token) else {
            return Err(StoreError::UnsupportedFormat {
                requested: token.to_string(),
            });
        };

        let source_format = ImageFormatKind::parse(&asset.declared_format);
        let raw = asset.raw_bytes;
        let converted = tokio::task::spawn_blocking(move || {
            let handle = ImageHandle::from_bytes(&raw, source_format);
            transform::convert_to(&handle, target)
        })
        .await
        .map_err(|e| {
            tracing::warn!(id, "Conversion task failed: {e}");
            StoreError::Conversion
        })?
        .map_err(|e| {
            tracing::warn!(id, target = %target, "Conversion failed: {e}");
            StoreError::Conversion
        })?;

        view.data = encode_base64(&converted);
        view.content_type = format!("image/{}", token.to_lowercase());
        Ok(view)
    }
}
