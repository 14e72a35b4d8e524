//! Shared dependencies for the pipelines.

use std::sync::Arc;

use kinema_catalog::CatalogRepository;
use kinema_media::EncoderTools;
use kinema_queue::StatusRegistry;
use kinema_storage::ObjectStore;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;

/// Everything a pipeline needs besides the job descriptor itself.
pub struct PipelineContext {
    pub storage: Arc<dyn ObjectStore>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub registry: Arc<StatusRegistry>,
    pub tools: EncoderTools,
    pub config: WorkerConfig,
}

impl PipelineContext {
    /// Build a context, resolving the encoder tool family up front so a
    /// misconfigured executable path fails at startup, not mid-job.
    pub fn new(
        storage: Arc<dyn ObjectStore>,
        catalog: Arc<dyn CatalogRepository>,
        registry: Arc<StatusRegistry>,
        config: WorkerConfig,
    ) -> WorkerResult<Self> {
        let tools = EncoderTools::resolve(
            config.ffmpeg_path.as_deref(),
            config.ffprobe_path.as_deref(),
        )?;
        Ok(Self {
            storage,
            catalog,
            registry,
            tools,
            config,
        })
    }
}
