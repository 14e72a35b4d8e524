//! The narrow object-store interface the pipelines depend on.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Receipt returned by a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Stored object size in bytes
    pub size: u64,
    /// Backend checksum (entity tag for S3 backends)
    pub checksum: String,
}

/// Object store operations used by the pipelines.
///
/// Jobs operate on keys unique to the job, so callers need no client-side
/// locking; concurrent jobs never collide on object keys.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file.
    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<UploadReceipt>;

    /// Upload raw bytes.
    async fn upload_bytes(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<UploadReceipt>;

    /// Download an object to a local destination, creating parent
    /// directories as needed.
    async fn download_file(&self, bucket: &str, key: &str, dest: &Path) -> StorageResult<()>;

    /// Download an object as bytes.
    async fn download_bytes(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object.
    async fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Generate a temporary signed GET URL.
    async fn presign(&self, bucket: &str, key: &str, ttl: Duration) -> StorageResult<String>;
}
