//! In-memory object store for tests and local development.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::store::{ObjectStore, UploadReceipt};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// Object store backed by a process-local map.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys currently stored in the given bucket, sorted.
    pub fn keys_in(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .read()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Content type recorded for an object, if present.
    pub fn content_type_of(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .read()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.content_type.clone())
    }

    fn put(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) -> UploadReceipt {
        let size = data.len() as u64;
        let checksum = format!("{:08x}", fletcher32(&data));
        self.objects.write().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        UploadReceipt { size, checksum }
    }
}

// Cheap stand-in for a backend entity tag.
fn fletcher32(data: &[u8]) -> u32 {
    let (mut a, mut b) = (0u32, 0u32);
    for chunk in data.chunks(359) {
        for &byte in chunk {
            a += byte as u32;
            b += a;
        }
        a %= 65535;
        b %= 65535;
    }
    (b << 16) | a
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<UploadReceipt> {
        let data = tokio::fs::read(path).await?;
        Ok(self.put(bucket, key, data, content_type))
    }

    async fn upload_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<UploadReceipt> {
        Ok(self.put(bucket, key, data, content_type))
    }

    async fn download_file(&self, bucket: &str, key: &str, dest: &Path) -> StorageResult<()> {
        let bytes = self.download_bytes(bucket, key).await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, bytes).await?;
        Ok(())
    }

    async fn download_bytes(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .read()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|o| o.data.clone())
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.objects
            .write()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn presign(&self, bucket: &str, key: &str, _ttl: Duration) -> StorageResult<String> {
        if !self
            .objects
            .read()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
        {
            return Err(StorageError::not_found(key));
        }
        Ok(format!("memory://{}/{}", bucket, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bytes_roundtrip() {
        let store = MemoryStore::new();
        let receipt = store
            .upload_bytes("media", "a/b.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();
        assert_eq!(receipt.size, 5);
        assert!(!receipt.checksum.is_empty());

        let data = store.download_bytes("media", "a/b.txt").await.unwrap();
        assert_eq!(data, b"hello");
        assert_eq!(
            store.content_type_of("media", "a/b.txt").as_deref(),
            Some("text/plain")
        );
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = MemoryStore::new();
        let err = store.download_bytes("media", "missing").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store
            .upload_bytes("media", "k", vec![1, 2, 3], "application/octet-stream")
            .await
            .unwrap();
        store.delete("media", "k").await.unwrap();
        store.delete("media", "k").await.unwrap();
        assert!(store.is_empty());
    }
}
