//! Routes of the storage service: `POST /images` and `GET /images/{id}`.

use async_trait::async_trait;
use hyper::Method;
use serde_json::json;

use super::{ApiRequest, Routes};
use crate::config::LimitsConfig;
use crate::envelope::Envelope;
use crate::error::UploadError;
use crate::store::AssetStore;

/// Upload and retrieval endpoints over an [`AssetStore`].
pub struct StorageRoutes {
    store: AssetStore,
    body_limit: usize,
    max_upload_mb: u64,
}

impl StorageRoutes {
    /// Request bodies are read up to `limits.max_upload_bytes()`.
    pub fn new(store: AssetStore, limits: &LimitsConfig) -> Self {
        let body_limit = usize::try_from(limits.max_upload_bytes()).unwrap_or(usize::MAX);
        Self {
            store,
            body_limit,
            max_upload_mb: limits.max_upload_size_mb,
        }
    }

    async fn upload(&self, request: ApiRequest) -> Envelope {
        let host = request.peer.ip().to_string();
        match self
            .store
            .upload(request.body.to_vec(), request.content_type.as_deref(), &host)
            .await
        {
            Ok(id) => Envelope::ok(json!({ "id": id })),
            Err(e) => {
                tracing::debug!("Upload from {host} rejected: {e}");
                Envelope::failure(e.to_string())
            }
        }
    }

    async fn retrieve(&self, id: &str, request: &ApiRequest) -> Envelope {
        let requested = request.query_param("type");
        match self.store.get(id, requested.as_deref()).await {
            Ok(view) => Envelope::ok(view),
            Err(e) => {
                tracing::debug!("Retrieval of {id} failed: {e}");
                Envelope::failure(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Routes for StorageRoutes {
    fn name(&self) -> &'static str {
        "storage"
    }

    fn body_limit(&self) -> usize {
        self.body_limit
    }

    fn body_too_large(&self) -> Envelope {
        Envelope::failure(
            UploadError::TooLarge {
                max_mb: self.max_upload_mb,
            }
            .to_string(),
        )
    }

    async fn dispatch(&self, request: ApiRequest) -> Option<Envelope> {
        let path = request.path.trim_end_matches('/').to_string();
        match (&request.method, path.as_str()) {
            (&Method::POST, "/images") => Some(self.upload(request).await),
            (&Method::GET, p) => {
                let id = p.strip_prefix("/images/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Some(self.retrieve(id, &request).await)
            }
            _ => None,
        }
    }
}
