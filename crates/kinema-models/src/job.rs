//! Job descriptors for queue processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an episode within a series title.
///
/// Single-feature movies carry no episode reference; episodic content
/// carries the episode record id plus season/episode numbers used in the
/// object-key layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRef {
    /// Episode record id in the catalog
    pub episode_id: String,
    /// Season number (1-based)
    pub season_number: u32,
    /// Episode number within the season (1-based)
    pub episode_number: u32,
}

/// Job to transcode one uploaded source into an HLS package.
///
/// Immutable once enqueued. Re-submission after a failure requires a new
/// job with a fresh id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeJob {
    /// Unique job ID
    pub job_id: JobId,
    /// Bucket holding the uploaded source object
    pub source_bucket: String,
    /// Key of the uploaded source object
    pub source_key: String,
    /// Target movie id in the catalog
    pub movie_id: String,
    /// Episode reference for episodic content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeRef>,
    /// Requested quality profiles ("1080", "720", ...); empty means default ladder
    #[serde(default)]
    pub profiles: Vec<String>,
    /// BCP-47 language tag of the primary audio
    pub language: String,
    /// When the job was created
    pub created_at: DateTime<Utc>,
}

impl TranscodeJob {
    /// Create a new transcode job for a single-feature title.
    pub fn new(
        source_bucket: impl Into<String>,
        source_key: impl Into<String>,
        movie_id: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            job_id: JobId::new(),
            source_bucket: source_bucket.into(),
            source_key: source_key.into(),
            movie_id: movie_id.into(),
            episode: None,
            profiles: Vec::new(),
            language: language.into(),
            created_at: Utc::now(),
        }
    }

    /// Attach an episode reference.
    pub fn with_episode(mut self, episode: EpisodeRef) -> Self {
        self.episode = Some(episode);
        self
    }

    /// Set the requested quality profiles.
    pub fn with_profiles(mut self, profiles: Vec<String>) -> Self {
        self.profiles = profiles;
        self
    }
}

/// Job to attach one subtitle track.
///
/// The destination key is fixed at enqueue time, so re-running the same
/// upload is idempotent at that key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleJob {
    /// Unique job ID
    pub job_id: JobId,
    /// Target movie id in the catalog
    pub movie_id: String,
    /// Episode reference for episodic content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeRef>,
    /// BCP-47 language tag of the track
    pub language: String,
    /// Human-readable track label ("English", "Forced", ...)
    pub label: String,
    /// Bucket holding the staged raw track
    pub staging_bucket: String,
    /// Key of the staged raw track
    pub staging_key: String,
    /// Destination bucket for the published track
    pub dest_bucket: String,
    /// Destination key, fixed at enqueue time
    pub dest_key: String,
    /// When the job was created
    pub created_at: DateTime<Utc>,
}

impl SubtitleJob {
    /// Create a new subtitle job.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        movie_id: impl Into<String>,
        language: impl Into<String>,
        label: impl Into<String>,
        staging_bucket: impl Into<String>,
        staging_key: impl Into<String>,
        dest_bucket: impl Into<String>,
        dest_key: impl Into<String>,
    ) -> Self {
        Self {
            job_id: JobId::new(),
            movie_id: movie_id.into(),
            episode: None,
            language: language.into(),
            label: label.into(),
            staging_bucket: staging_bucket.into(),
            staging_key: staging_key.into(),
            dest_bucket: dest_bucket.into(),
            dest_key: dest_key.into(),
            created_at: Utc::now(),
        }
    }

    /// Attach an episode reference.
    pub fn with_episode(mut self, episode: EpisodeRef) -> Self {
        self.episode = Some(episode);
        self
    }
}
