//! Worker configuration.

use std::path::PathBuf;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Work directory for per-job temporary files
    pub work_dir: PathBuf,
    /// Explicitly configured encoder executable
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicitly configured prober executable
    pub ffprobe_path: Option<PathBuf>,
    /// Bucket holding published HLS packages and subtitle tracks
    pub media_bucket: String,
    /// Public endpoint base the media bucket is served from
    pub public_endpoint: String,
    /// Worker loops spawned per job kind
    pub workers_per_kind: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/tmp/kinema"),
            ffmpeg_path: None,
            ffprobe_path: None,
            media_bucket: "media".to_string(),
            public_endpoint: "http://localhost:9000/media".to_string(),
            workers_per_kind: 1,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/kinema")),
            ffmpeg_path: std::env::var("FFMPEG_PATH").ok().map(PathBuf::from),
            ffprobe_path: std::env::var("FFPROBE_PATH").ok().map(PathBuf::from),
            media_bucket: std::env::var("MEDIA_BUCKET").unwrap_or_else(|_| "media".to_string()),
            public_endpoint: std::env::var("PUBLIC_MEDIA_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000/media".to_string()),
            workers_per_kind: std::env::var("WORKERS_PER_KIND")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        }
    }
}
