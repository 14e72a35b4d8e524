//! Object store client for media packages.
//!
//! The pipelines consume storage through the narrow [`ObjectStore`]
//! trait; the default backend is any S3-compatible endpoint (MinIO in
//! deployment). An in-memory backend is provided for tests and local
//! development.

pub mod error;
pub mod memory;
pub mod s3;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use s3::{S3Config, S3Store};
pub use store::{ObjectStore, UploadReceipt};

#[cfg(feature = "mocks")]
pub use store::MockObjectStore;
