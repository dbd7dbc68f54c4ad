//! Directory-backed document store: one JSON file per asset.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::DocumentStore;
use crate::asset::AssetRecord;
use crate::error::StoreError;

/// Stores each document as `<dir>/<id>.json`.
pub struct FileDocumentStore {
    dir: PathBuf,
}

impl FileDocumentStore {
    /// Open (and create if needed) a document directory.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::Backend(format!("cannot create {}: {e}", dir.display()))
        })?;
        tracing::debug!("File document store at {}", dir.display());
        Ok(Self { dir })
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Document path for `id`, or `None` for ids this store never issues.
    ///
    /// Only canonical UUIDs map to a file, which also keeps arbitrary client
    /// input out of filesystem paths.
    fn document_path(&self, id: &str) -> Option<PathBuf> {
        let uuid = uuid::Uuid::parse_str(id).ok()?;
        if uuid.hyphenated().to_string() != id {
            return None;
        }
        Some(self.dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn insert(&self, record: AssetRecord) -> Result<(), StoreError> {
        let path = self
            .document_path(&record.id)
            .ok_or_else(|| StoreError::Backend(format!("invalid id {}", record.id)))?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StoreError::Backend(format!("duplicate id {}", record.id)));
        }

        let json = serde_json::to_vec(&record)
            .map_err(|e| StoreError::Backend(format!("serialize {}: {e}", record.id)))?;

        // Write-then-rename so readers never observe a partial document
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::Backend(format!("write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::Backend(format!("rename {}: {e}", path.display())))?;
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<AssetRecord>, StoreError> {
        let Some(path) = self.document_path(id) else {
            return Ok(None);
        };
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "read {}: {e}",
                    path.display()
                )))
            }
        };
        let record = serde_json::from_slice(&content)
            .map_err(|e| StoreError::Backend(format!("parse {}: {e}", path.display())))?;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ImageAsset;

    #[tokio::test]
    async fn test_insert_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::open(dir.path().join("docs")).await.unwrap();
        let record = ImageAsset::new(b"abc".to_vec(), "JPEG".into(), "::1".into()).to_record();
        store.insert(record.clone()).await.unwrap();

        assert!(store.dir().join(format!("{}.json", record.id)).exists());
        assert_eq!(store.find(&record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let record = ImageAsset::new(vec![7], "PNG".into(), String::new()).to_record();
        {
            let store = FileDocumentStore::open(dir.path()).await.unwrap();
            store.insert(record.clone()).await.unwrap();
        }
        let reopened = FileDocumentStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.find(&record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_non_uuid_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::open(dir.path()).await.unwrap();
        for id in ["fake_uuid", "../etc/passwd", "", "1B4E28BA-2FA1-11D2-883F-0016D3CCA427"] {
            assert_eq!(store.find(id).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::open(dir.path()).await.unwrap();
        let record = ImageAsset::new(vec![1], "GIF".into(), String::new()).to_record();
        store.insert(record.clone()).await.unwrap();
        assert!(store.insert(record).await.is_err());
    }
}
