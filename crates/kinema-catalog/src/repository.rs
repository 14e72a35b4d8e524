//! The narrow metadata-repository interface the pipelines depend on.

use async_trait::async_trait;

use kinema_models::{SubtitleAsset, VideoAsset};

use crate::error::CatalogResult;

/// Metadata repository operations used by the pipelines.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Persist a transcode job's asset records as one batch: the Master
    /// plus every Variant, all or nothing.
    async fn add_video_assets(&self, assets: Vec<VideoAsset>) -> CatalogResult<()>;

    /// Persist one subtitle asset record.
    async fn add_subtitle_asset(&self, asset: SubtitleAsset) -> CatalogResult<()>;

    /// Backfill the probed duration onto a single-feature title.
    async fn set_movie_duration(&self, movie_id: &str, duration_secs: f64) -> CatalogResult<()>;

    /// Backfill the probed duration onto an episode record.
    async fn set_episode_duration(&self, episode_id: &str, duration_secs: f64)
        -> CatalogResult<()>;

    /// Video assets recorded for a movie.
    async fn find_video_assets(&self, movie_id: &str) -> CatalogResult<Vec<VideoAsset>>;

    /// Subtitle assets recorded for a movie.
    async fn find_subtitle_assets(&self, movie_id: &str) -> CatalogResult<Vec<SubtitleAsset>>;
}
