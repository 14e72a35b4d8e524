//! The subtitle pipeline.
//!
//! Moves one staged track to its published key and records the catalog
//! entry. The destination key is fixed at enqueue time, so re-running
//! the same upload overwrites the same object.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use kinema_models::{JobStatus, SubtitleAsset, SubtitleJob};

use crate::cancel::{ensure_active, with_cancel};
use crate::context::PipelineContext;
use crate::error::{WorkerError, WorkerResult};

const SUBTITLE_CONTENT_TYPE: &str = "text/vtt";

/// Pipeline publishing one staged subtitle track.
pub struct SubtitlePipeline {
    ctx: Arc<PipelineContext>,
}

impl SubtitlePipeline {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self { ctx }
    }

    /// Process one job to completion; returns the published track key.
    pub async fn run(
        &self,
        job: &SubtitleJob,
        cancel: watch::Receiver<bool>,
    ) -> WorkerResult<String> {
        self.ctx
            .registry
            .upsert(JobStatus::running(job.job_id.clone(), 0));

        // Format check precedes every storage and catalog side effect.
        if !job.dest_key.ends_with(".vtt") {
            return Err(WorkerError::invalid_subtitle_format(format!(
                "destination {} is not a WebVTT track",
                job.dest_key
            )));
        }
        ensure_active(&cancel)?;

        let track = with_cancel(
            &cancel,
            self.ctx
                .storage
                .download_bytes(&job.staging_bucket, &job.staging_key),
        )
        .await?;
        self.ctx
            .registry
            .upsert(JobStatus::running(job.job_id.clone(), 50));

        with_cancel(
            &cancel,
            self.ctx.storage.upload_bytes(
                &job.dest_bucket,
                &job.dest_key,
                track,
                SUBTITLE_CONTENT_TYPE,
            ),
        )
        .await?;

        let episode_id = job.episode.as_ref().map(|ep| ep.episode_id.clone());
        self.ctx
            .catalog
            .add_subtitle_asset(SubtitleAsset::new(
                &job.movie_id,
                episode_id,
                &job.language,
                &job.label,
                &job.dest_bucket,
                &job.dest_key,
                &self.ctx.config.public_endpoint,
            ))
            .await?;

        // The staged object is scratch; leaving it behind is harmless.
        if let Err(err) = self
            .ctx
            .storage
            .delete(&job.staging_bucket, &job.staging_key)
            .await
        {
            warn!("Failed to delete staged track {}: {}", job.staging_key, err);
        }

        self.ctx
            .registry
            .upsert(JobStatus::done(job.job_id.clone(), job.dest_key.clone()));
        info!("Subtitle job {} published {}", job.job_id, job.dest_key);
        Ok(job.dest_key.clone())
    }
}
