//! imgvault core - image storage, format conversion and transform services.
//!
//! A storage service owns canonical image bytes and metadata. Stateless
//! transform services fetch an asset from it, apply one pure transform and
//! return the encoded result.
//!
//! # Architecture
//!
//! ```text
//! client → rotate/resize service → (fetch) storage service → transform → client
//! client → storage service → (optional) format conversion → client
//! ```
//!
//! Every endpoint answers HTTP 200 with a `{success, message, data}` envelope.
//!
//! # Usage
//!
//! ```rust,ignore
//! use imgvault_core::Config;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> imgvault_core::Result<()> {
//!     let config = Config::load()?;
//!     let storage = imgvault_core::start_storage_service(&config).await?;
//!     println!("storage listening on {}", storage.url());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod asset;
pub mod client;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod format;
pub mod http;
pub mod service;
pub mod store;
pub mod transform;

// Re-exports for convenient access
pub use asset::{AssetRecord, AssetView, ImageAsset};
pub use client::StorageClient;
pub use config::Config;
pub use envelope::Envelope;
pub use error::{
    ConfigError, FetchError, ImgvaultError, Result, ServiceError, StoreError, TransformError,
    UploadError,
};
pub use format::ImageFormatKind;
pub use http::ServerHandle;
pub use service::{ResizeService, RotateService, TransformContext};
pub use store::{AssetStore, DocumentStore, DocumentStoreFactory};
pub use transform::ImageHandle;

use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Start the storage service with the configured backend.
pub async fn start_storage_service(config: &Config) -> Result<ServerHandle> {
    let backend = DocumentStoreFactory::create(config).await?;
    let store = AssetStore::new(backend, config.limits.clone());
    let routes = http::StorageRoutes::new(store, &config.limits);
    let handle =
        http::start_server(&config.storage.host, config.storage.port, Arc::new(routes)).await?;
    Ok(handle)
}

/// Start the rotation service, fetching from `config.client.storage_url`.
pub async fn start_rotation_service(config: &Config) -> Result<ServerHandle> {
    let service = RotateService::new(TransformContext::new(config)?);
    let routes = http::RotateRoutes::new(service);
    let handle =
        http::start_server(&config.rotation.host, config.rotation.port, Arc::new(routes)).await?;
    Ok(handle)
}

/// Start the resizing service, fetching from `config.client.storage_url`.
pub async fn start_resizing_service(config: &Config) -> Result<ServerHandle> {
    let service = ResizeService::new(TransformContext::new(config)?);
    let routes = http::ResizeRoutes::new(service);
    let handle =
        http::start_server(&config.resizing.host, config.resizing.port, Arc::new(routes)).await?;
    Ok(handle)
}
