//! In-process document backend.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::asset::AssetRecord;
use crate::error::StoreError;

/// Documents held in a map for the lifetime of the process.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, AssetRecord>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, record: AssetRecord) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&record.id) {
            return Err(StoreError::Backend(format!("duplicate id {}", record.id)));
        }
        documents.insert(record.id.clone(), record);
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<AssetRecord>, StoreError> {
        Ok(self.documents.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ImageAsset;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryDocumentStore::new();
        assert!(store.is_empty().await);
        let record = ImageAsset::new(vec![1, 2], "PNG".into(), String::new()).to_record();
        store.insert(record.clone()).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.find(&record.id).await.unwrap(), Some(record));
        assert_eq!(store.find("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let store = MemoryDocumentStore::new();
        let record = ImageAsset::new(vec![1], "PNG".into(), String::new()).to_record();
        store.insert(record.clone()).await.unwrap();
        assert!(matches!(
            store.insert(record).await,
            Err(StoreError::Backend(_))
        ));
    }
}
