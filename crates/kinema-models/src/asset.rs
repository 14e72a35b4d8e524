//! Asset records written by the pipelines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a video asset within an HLS package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Top-level manifest referencing every variant
    Master,
    /// One bitrate-ladder tier
    Variant,
}

/// Publish state of an asset record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    #[default]
    Published,
    Hidden,
}

/// A video asset produced by a successful transcode job.
///
/// One Master plus one Variant per requested profile is written per job,
/// in a single catalog batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAsset {
    /// Record id
    pub id: String,
    /// Parent movie id
    pub movie_id: String,
    /// Parent episode id for episodic content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    /// Master or Variant
    pub kind: AssetKind,
    /// Quality level ("1080", "720", ...); for the Master this is the top profile
    pub quality: String,
    /// Audio language tag
    pub language: String,
    /// Bucket holding the manifest
    pub bucket: String,
    /// Manifest object key
    pub key: String,
    /// Public endpoint base the key is served from
    pub endpoint: String,
    /// Manifest content type
    pub content_type: String,
    /// Publish state
    #[serde(default)]
    pub publish_status: PublishStatus,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl VideoAsset {
    /// Create a new record with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        movie_id: impl Into<String>,
        episode_id: Option<String>,
        kind: AssetKind,
        quality: impl Into<String>,
        language: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            movie_id: movie_id.into(),
            episode_id,
            kind,
            quality: quality.into(),
            language: language.into(),
            bucket: bucket.into(),
            key: key.into(),
            endpoint: endpoint.into(),
            content_type: "application/vnd.apple.mpegurl".to_string(),
            publish_status: PublishStatus::default(),
            created_at: Utc::now(),
        }
    }
}

/// A subtitle asset produced by a successful subtitle job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleAsset {
    /// Record id
    pub id: String,
    /// Parent movie id
    pub movie_id: String,
    /// Parent episode id for episodic content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    /// Track language tag
    pub language: String,
    /// Human-readable track label
    pub label: String,
    /// Bucket holding the track
    pub bucket: String,
    /// Track object key
    pub key: String,
    /// Public endpoint base the key is served from
    pub endpoint: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl SubtitleAsset {
    /// Create a new record with a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        movie_id: impl Into<String>,
        episode_id: Option<String>,
        language: impl Into<String>,
        label: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            movie_id: movie_id.into(),
            episode_id,
            language: language.into(),
            label: label.into(),
            bucket: bucket.into(),
            key: key.into(),
            endpoint: endpoint.into(),
            created_at: Utc::now(),
        }
    }
}
