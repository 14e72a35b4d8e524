//! Shared data models for the Kinema encoding backend.
//!
//! This crate provides Serde-serializable types for:
//! - Transcode and subtitle job descriptors
//! - Job status snapshots for polling
//! - Video and subtitle asset records
//! - Quality profiles and the bitrate ladder
//! - Deterministic object-key layout for HLS packages

pub mod asset;
pub mod job;
pub mod keys;
pub mod profile;
pub mod status;

// Re-export common types
pub use asset::{AssetKind, PublishStatus, SubtitleAsset, VideoAsset};
pub use job::{EpisodeRef, JobId, SubtitleJob, TranscodeJob};
pub use keys::{hls_master_key, hls_package_prefix, hls_variant_key, subtitle_key};
pub use profile::{resolve_ladder, QualityProfile, DEFAULT_LADDER};
pub use status::{JobState, JobStatus};
