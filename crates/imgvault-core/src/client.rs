//! HTTP client used by transform services to fetch assets from storage.
//!
//! Talks to the storage service's retrieval endpoint. Every failure mode of
//! the hop (transport, timeout, unreadable reply, store-reported failure) is
//! surfaced as a [`FetchError`]; nothing is retried.

use std::time::Duration;

use crate::asset::AssetView;
use crate::config::ClientConfig;
use crate::envelope::Envelope;
use crate::error::FetchError;

/// Client for `GET /images/{id}` on the storage service.
#[derive(Clone)]
pub struct StorageClient {
    base_url: reqwest::Url,
    client: reqwest::Client,
}

impl StorageClient {
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let base_url = reqwest::Url::parse(config.storage_url.trim_end_matches('/'))
            .map_err(|e| FetchError::Unavailable(format!("invalid storage url: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .build()
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    /// URL of the retrieval endpoint for `id`, with the id percent-encoded.
    fn image_url(&self, id: &str) -> Result<reqwest::Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Unavailable("storage url cannot be a base".into()))?
            .pop_if_empty()
            .push("images")
            .push(id);
        Ok(url)
    }

    /// Fetch an asset without any format override.
    pub async fn fetch(&self, id: &str) -> Result<AssetView, FetchError> {
        let url = self.image_url(id)?;
        tracing::debug!("Fetching {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Unavailable(e.to_string()))?;

        let envelope: Envelope = resp
            .json()
            .await
            .map_err(|e| FetchError::Unavailable(format!("unreadable storage reply: {e}")))?;

        if !envelope.success {
            return Err(FetchError::Rejected(envelope.message));
        }

        serde_json::from_value(envelope.data)
            .map_err(|e| FetchError::Unavailable(format!("unexpected asset layout: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> StorageClient {
        StorageClient::new(&ClientConfig {
            storage_url: url.to_string(),
            fetch_timeout_ms: 500,
        })
        .unwrap()
    }

    #[test]
    fn test_image_url() {
        let c = client("http://storage_api:8080/");
        assert_eq!(
            c.image_url("abc").unwrap().as_str(),
            "http://storage_api:8080/images/abc"
        );
    }

    #[test]
    fn test_image_url_escapes_id() {
        let c = client("http://127.0.0.1:8080");
        assert_eq!(
            c.image_url("a/b?c").unwrap().as_str(),
            "http://127.0.0.1:8080/images/a%2Fb%3Fc"
        );
    }

    #[tokio::test]
    async fn test_unreachable_storage_is_unavailable() {
        // Port 9 (discard) is not expected to run an HTTP server
        let c = client("http://127.0.0.1:9");
        let err = c.fetch("abc").await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)));
        assert!(err.to_string().starts_with("Failed to fetch image: "));
    }
}
