//! Worker loops draining the job channels.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use kinema_models::{JobStatus, SubtitleJob, TranscodeJob};
use kinema_queue::{JobChannel, QueueError, QueueJob};

use crate::context::PipelineContext;
use crate::error::{WorkerError, WorkerResult};
use crate::subtitle::SubtitlePipeline;
use crate::transcode::TranscodePipeline;

/// A pipeline that can process jobs of one kind.
#[async_trait]
pub trait JobPipeline<J: QueueJob>: Send + Sync {
    /// Process one job to completion, returning the result object key.
    async fn process(&self, job: &J, cancel: watch::Receiver<bool>) -> WorkerResult<String>;
}

#[async_trait]
impl JobPipeline<TranscodeJob> for TranscodePipeline {
    async fn process(
        &self,
        job: &TranscodeJob,
        cancel: watch::Receiver<bool>,
    ) -> WorkerResult<String> {
        self.run(job, cancel).await
    }
}

#[async_trait]
impl JobPipeline<SubtitleJob> for SubtitlePipeline {
    async fn process(
        &self,
        job: &SubtitleJob,
        cancel: watch::Receiver<bool>,
    ) -> WorkerResult<String> {
        self.run(job, cancel).await
    }
}

/// Drain one channel until shutdown.
///
/// A failed job writes its terminal Failed record and the loop moves on;
/// one bad job never takes the worker down. The successful pipeline
/// writes its own Done record, so the loop only handles the error side.
pub async fn run_worker_loop<J, P>(
    name: &str,
    channel: Arc<JobChannel<J>>,
    pipeline: Arc<P>,
    mut shutdown: watch::Receiver<bool>,
) where
    J: QueueJob,
    P: JobPipeline<J> + ?Sized,
{
    info!("Worker loop {} started", name);
    loop {
        let job = match channel.dequeue(&mut shutdown).await {
            Ok(job) => job,
            Err(QueueError::Cancelled) => break,
        };

        let job_id = job.job_id().clone();
        info!("Worker {} picked up job {}", name, job_id);

        match pipeline.process(&job, shutdown.clone()).await {
            Ok(result_key) => info!("Job {} finished: {}", job_id, result_key),
            Err(err) => {
                let message = if err.is_cancelled() {
                    info!("Job {} cancelled", job_id);
                    WorkerError::Cancelled.to_string()
                } else {
                    error!("Job {} failed: {}", job_id, err);
                    err.to_string()
                };
                channel
                    .registry()
                    .upsert(JobStatus::failed(job_id, message));
            }
        }
    }
    info!("Worker loop {} stopped", name);
}

/// Spawn the configured number of loops for both job kinds.
pub fn spawn_workers(
    ctx: Arc<PipelineContext>,
    transcode_channel: Arc<JobChannel<TranscodeJob>>,
    subtitle_channel: Arc<JobChannel<SubtitleJob>>,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    let loops = ctx.config.workers_per_kind.max(1);
    let transcode = Arc::new(TranscodePipeline::new(Arc::clone(&ctx)));
    let subtitle = Arc::new(SubtitlePipeline::new(ctx));

    let mut handles = Vec::with_capacity(loops * 2);
    for i in 0..loops {
        let name = format!("transcode-{}", i);
        let channel = Arc::clone(&transcode_channel);
        let pipeline = Arc::clone(&transcode);
        let rx = shutdown.clone();
        handles.push(tokio::spawn(async move {
            run_worker_loop(&name, channel, pipeline, rx).await;
        }));

        let name = format!("subtitle-{}", i);
        let channel = Arc::clone(&subtitle_channel);
        let pipeline = Arc::clone(&subtitle);
        let rx = shutdown.clone();
        handles.push(tokio::spawn(async move {
            run_worker_loop(&name, channel, pipeline, rx).await;
        }));
    }
    handles
}
