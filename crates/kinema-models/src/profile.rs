//! Quality profiles and the bitrate ladder.

use serde::{Deserialize, Serialize};

/// Default ladder used when a job requests no explicit profiles.
pub const DEFAULT_LADDER: [&str; 3] = ["1080", "720", "480"];

/// One resolved rung of the bitrate ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Profile name as requested ("1080", "720", ...)
    pub name: String,
    /// Target vertical resolution in pixels
    pub height: u32,
    /// Fixed target video bitrate in kbps
    pub video_bitrate_kbps: u32,
}

impl QualityProfile {
    /// Resolve a requested profile name to its ladder rung.
    ///
    /// Bitrates are fixed per-profile constants, not derived from the
    /// source bitrate.
    pub fn resolve(name: &str) -> Self {
        let height = name.trim().parse::<u32>().unwrap_or(480);
        let video_bitrate_kbps = match height {
            1080 => 5000,
            720 => 2800,
            _ => 1400,
        };
        Self {
            name: name.trim().to_string(),
            height,
            video_bitrate_kbps,
        }
    }
}

/// Resolve a job's requested profiles into an ordered ladder,
/// descending by resolution.
///
/// An empty request yields the default 1080/720/480 ladder. The ordering
/// drives master-manifest stream order only; it carries no correctness
/// dependency.
pub fn resolve_ladder(requested: &[String]) -> Vec<QualityProfile> {
    let mut ladder: Vec<QualityProfile> = if requested.is_empty() {
        DEFAULT_LADDER.iter().map(|p| QualityProfile::resolve(p)).collect()
    } else {
        requested.iter().map(|p| QualityProfile::resolve(p)).collect()
    };
    ladder.sort_by(|a, b| b.height.cmp(&a.height));
    ladder.dedup_by(|a, b| a.height == b.height);
    ladder
}
