//! In-memory catalog backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use kinema_models::{SubtitleAsset, VideoAsset};

use crate::error::CatalogResult;
use crate::repository::CatalogRepository;

/// Catalog backed by process-local maps.
#[derive(Default)]
pub struct MemoryCatalog {
    video_assets: RwLock<Vec<VideoAsset>>,
    subtitle_assets: RwLock<Vec<SubtitleAsset>>,
    movie_durations: RwLock<HashMap<String, f64>>,
    episode_durations: RwLock<HashMap<String, f64>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded duration of a movie, if backfilled.
    pub fn movie_duration(&self, movie_id: &str) -> Option<f64> {
        self.movie_durations.read().unwrap().get(movie_id).copied()
    }

    /// Recorded duration of an episode, if backfilled.
    pub fn episode_duration(&self, episode_id: &str) -> Option<f64> {
        self.episode_durations
            .read()
            .unwrap()
            .get(episode_id)
            .copied()
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn add_video_assets(&self, assets: Vec<VideoAsset>) -> CatalogResult<()> {
        debug!("Persisting {} video asset records", assets.len());
        self.video_assets.write().unwrap().extend(assets);
        Ok(())
    }

    async fn add_subtitle_asset(&self, asset: SubtitleAsset) -> CatalogResult<()> {
        self.subtitle_assets.write().unwrap().push(asset);
        Ok(())
    }

    async fn set_movie_duration(&self, movie_id: &str, duration_secs: f64) -> CatalogResult<()> {
        self.movie_durations
            .write()
            .unwrap()
            .insert(movie_id.to_string(), duration_secs);
        Ok(())
    }

    async fn set_episode_duration(
        &self,
        episode_id: &str,
        duration_secs: f64,
    ) -> CatalogResult<()> {
        self.episode_durations
            .write()
            .unwrap()
            .insert(episode_id.to_string(), duration_secs);
        Ok(())
    }

    async fn find_video_assets(&self, movie_id: &str) -> CatalogResult<Vec<VideoAsset>> {
        Ok(self
            .video_assets
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.movie_id == movie_id)
            .cloned()
            .collect())
    }

    async fn find_subtitle_assets(&self, movie_id: &str) -> CatalogResult<Vec<SubtitleAsset>> {
        Ok(self
            .subtitle_assets
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.movie_id == movie_id)
            .cloned()
            .collect())
    }
}
