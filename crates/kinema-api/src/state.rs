//! Application state.

use std::sync::Arc;

use kinema_models::{SubtitleJob, TranscodeJob};
use kinema_queue::{JobChannel, StatusRegistry};
use kinema_storage::ObjectStore;

use crate::config::ApiConfig;

/// Shared application state.
///
/// The job channels are the same instances the in-process worker loops
/// drain; enqueueing here hands work straight to them.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub storage: Arc<dyn ObjectStore>,
    pub registry: Arc<StatusRegistry>,
    pub transcode_queue: Arc<JobChannel<TranscodeJob>>,
    pub subtitle_queue: Arc<JobChannel<SubtitleJob>>,
}

impl AppState {
    /// Create state over an already-constructed backend set.
    pub fn new(
        config: ApiConfig,
        storage: Arc<dyn ObjectStore>,
        registry: Arc<StatusRegistry>,
        transcode_queue: Arc<JobChannel<TranscodeJob>>,
        subtitle_queue: Arc<JobChannel<SubtitleJob>>,
    ) -> Self {
        Self {
            config,
            storage,
            registry,
            transcode_queue,
            subtitle_queue,
        }
    }
}
