//! The HLS encode pipeline.
//!
//! One job downloads its source, probes it, encodes the whole bitrate
//! ladder in a single encoder invocation, uploads the package master
//! manifest first, and records the asset batch in the catalog. The
//! per-job work directory is removed on every exit path; its loss is
//! never a job failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use kinema_media::{has_audio_stream, probe_duration, EncoderRunner, HlsEncode, ProgressEstimator};
use kinema_models::{
    hls_master_key, hls_package_prefix, hls_variant_key, resolve_ladder, AssetKind, JobStatus,
    QualityProfile, TranscodeJob, VideoAsset,
};

use crate::cancel::{ensure_active, with_cancel};
use crate::context::PipelineContext;
use crate::error::WorkerResult;

const MANIFEST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";
const SEGMENT_CONTENT_TYPE: &str = "video/mp2t";

/// Pipeline turning one uploaded source into a published HLS package.
pub struct TranscodePipeline {
    ctx: Arc<PipelineContext>,
}

impl TranscodePipeline {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self { ctx }
    }

    /// Process one job to completion; returns the master manifest key.
    pub async fn run(
        &self,
        job: &TranscodeJob,
        cancel: watch::Receiver<bool>,
    ) -> WorkerResult<String> {
        self.ctx
            .registry
            .upsert(JobStatus::running(job.job_id.clone(), 0));

        let workdir = self
            .ctx
            .config
            .work_dir
            .join(format!("transcode-{}", job.job_id));
        tokio::fs::create_dir_all(&workdir).await?;

        let outcome = self.encode_and_publish(job, &workdir, &cancel).await;

        // Best effort; scratch left behind never fails the job.
        if let Err(err) = tokio::fs::remove_dir_all(&workdir).await {
            warn!("Failed to remove work dir {}: {}", workdir.display(), err);
        }

        let master_key = outcome?;
        self.ctx
            .registry
            .upsert(JobStatus::done(job.job_id.clone(), master_key.clone()));
        info!("Transcode job {} published {}", job.job_id, master_key);
        Ok(master_key)
    }

    async fn encode_and_publish(
        &self,
        job: &TranscodeJob,
        workdir: &Path,
        cancel: &watch::Receiver<bool>,
    ) -> WorkerResult<String> {
        ensure_active(cancel)?;

        let source = workdir.join(source_file_name(&job.source_key));
        with_cancel(
            cancel,
            self.ctx
                .storage
                .download_file(&job.source_bucket, &job.source_key, &source),
        )
        .await?;

        let duration = probe_duration(&self.ctx.tools.ffprobe, &source).await?;
        let include_audio = has_audio_stream(&self.ctx.tools.ffprobe, &source).await?;

        // The duration is a property of the source, not of the package,
        // so it is written before the encode and survives a later failure.
        match &job.episode {
            Some(ep) => {
                self.ctx
                    .catalog
                    .set_episode_duration(&ep.episode_id, duration)
                    .await?
            }
            None => {
                self.ctx
                    .catalog
                    .set_movie_duration(&job.movie_id, duration)
                    .await?
            }
        }

        let ladder = resolve_ladder(&job.profiles);
        self.encode(job, workdir, &source, &ladder, include_audio, duration, cancel)
            .await?;

        ensure_active(cancel)?;
        let master_key = self.upload_package(job, workdir, &ladder, cancel).await?;
        self.persist_assets(job, &ladder, &master_key).await?;

        Ok(master_key)
    }

    #[allow(clippy::too_many_arguments)]
    async fn encode(
        &self,
        job: &TranscodeJob,
        workdir: &Path,
        source: &Path,
        ladder: &[QualityProfile],
        include_audio: bool,
        duration: f64,
        cancel: &watch::Receiver<bool>,
    ) -> WorkerResult<()> {
        let encode = HlsEncode::new(source, ladder.to_vec(), include_audio);

        let mut estimator = ProgressEstimator::new(duration);
        let registry = Arc::clone(&self.ctx.registry);
        let job_id = job.job_id.clone();

        EncoderRunner::new()
            .with_cancel(cancel.clone())
            .run_with_progress(
                &self.ctx.tools.ffmpeg,
                &encode.build_args(),
                workdir,
                move |line| {
                    if let Some(pct) = estimator.observe_line(line) {
                        registry.upsert(JobStatus::running(job_id.clone(), pct));
                    }
                },
            )
            .await?;

        Ok(())
    }

    /// Upload the whole package, master manifest first so the package
    /// entry point lands before anything referencing it.
    async fn upload_package(
        &self,
        job: &TranscodeJob,
        workdir: &Path,
        ladder: &[QualityProfile],
        cancel: &watch::Receiver<bool>,
    ) -> WorkerResult<String> {
        let bucket = &self.ctx.config.media_bucket;
        let prefix = hls_package_prefix(&job.movie_id, job.episode.as_ref());

        let master_key = hls_master_key(&job.movie_id, job.episode.as_ref());
        with_cancel(
            cancel,
            self.ctx.storage.upload_file(
                bucket,
                &master_key,
                &workdir.join("master.m3u8"),
                MANIFEST_CONTENT_TYPE,
            ),
        )
        .await?;

        for profile in ladder {
            let rendition_dir = workdir.join(&profile.name);
            let manifest_key = hls_variant_key(&job.movie_id, job.episode.as_ref(), &profile.name);
            with_cancel(
                cancel,
                self.ctx.storage.upload_file(
                    bucket,
                    &manifest_key,
                    &rendition_dir.join("index.m3u8"),
                    MANIFEST_CONTENT_TYPE,
                ),
            )
            .await?;

            for segment in list_segments(&rendition_dir).await? {
                let key = format!("{}/{}/{}", prefix, profile.name, segment);
                with_cancel(
                    cancel,
                    self.ctx.storage.upload_file(
                        bucket,
                        &key,
                        &rendition_dir.join(&segment),
                        SEGMENT_CONTENT_TYPE,
                    ),
                )
                .await?;
            }
        }

        Ok(master_key)
    }

    /// Record the Master plus one Variant per rung as a single batch.
    async fn persist_assets(
        &self,
        job: &TranscodeJob,
        ladder: &[QualityProfile],
        master_key: &str,
    ) -> WorkerResult<()> {
        let episode_id = job.episode.as_ref().map(|ep| ep.episode_id.clone());
        let bucket = &self.ctx.config.media_bucket;
        let endpoint = &self.ctx.config.public_endpoint;
        // Ladder is descending, so the first rung names the top quality.
        let top_quality = &ladder[0].name;

        let mut assets = vec![VideoAsset::new(
            &job.movie_id,
            episode_id.clone(),
            AssetKind::Master,
            top_quality,
            &job.language,
            bucket,
            master_key,
            endpoint,
        )];
        for profile in ladder {
            assets.push(VideoAsset::new(
                &job.movie_id,
                episode_id.clone(),
                AssetKind::Variant,
                &profile.name,
                &job.language,
                bucket,
                hls_variant_key(&job.movie_id, job.episode.as_ref(), &profile.name),
                endpoint,
            ));
        }

        self.ctx.catalog.add_video_assets(assets).await?;
        Ok(())
    }
}

/// Local name the source object is downloaded under, keeping its
/// extension so the encoder's format detection has a hint.
fn source_file_name(source_key: &str) -> String {
    match Path::new(source_key).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("source.{}", ext),
        None => "source".to_string(),
    }
}

/// Segment file names inside one rendition directory, sorted for a
/// deterministic upload order.
async fn list_segments(rendition_dir: &Path) -> std::io::Result<Vec<String>> {
    let mut segments = Vec::new();
    let mut entries = tokio::fs::read_dir(rendition_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = PathBuf::from(entry.file_name());
        if name.extension().and_then(|e| e.to_str()) == Some("ts") {
            segments.push(name.to_string_lossy().into_owned());
        }
    }
    segments.sort();
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_keeps_its_extension() {
        assert_eq!(source_file_name("raw/42/feature.mkv"), "source.mkv");
        assert_eq!(source_file_name("raw/42/feature"), "source");
    }

    #[tokio::test]
    async fn segment_listing_skips_manifests() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.m3u8"), b"#EXTM3U").unwrap();
        std::fs::write(dir.path().join("segment_001.ts"), b"a").unwrap();
        std::fs::write(dir.path().join("segment_000.ts"), b"b").unwrap();

        let segments = list_segments(dir.path()).await.unwrap();
        assert_eq!(segments, vec!["segment_000.ts", "segment_001.ts"]);
    }
}
