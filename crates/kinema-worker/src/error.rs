//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job cancelled before completion")]
    Cancelled,

    #[error("Invalid subtitle format: {0}")]
    InvalidSubtitleFormat(String),

    #[error("Media error: {0}")]
    Media(#[from] kinema_media::MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] kinema_storage::StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] kinema_catalog::CatalogError),

    #[error("Queue error: {0}")]
    Queue(#[from] kinema_queue::QueueError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn invalid_subtitle_format(msg: impl Into<String>) -> Self {
        Self::InvalidSubtitleFormat(msg.into())
    }

    /// Whether the job stopped because of a cancellation signal rather
    /// than a genuine processing failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            WorkerError::Cancelled | WorkerError::Media(kinema_media::MediaError::Cancelled)
        )
    }
}
