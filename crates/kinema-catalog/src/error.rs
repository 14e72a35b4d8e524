//! Catalog error types.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),
}

impl CatalogError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn persistence_failed(msg: impl Into<String>) -> Self {
        Self::PersistenceFailed(msg.into())
    }
}
