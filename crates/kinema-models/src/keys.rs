//! Deterministic object-key layout.
//!
//! Players resolve variant manifests and segments relative to the master
//! manifest, so this layout is part of the wire contract and must not
//! drift:
//!
//! - `hls/movies/{movie_id}/master.m3u8` for single-feature titles
//! - `hls/movies/{movie_id}/ss{season}/ep{episode}/master.m3u8` for episodes
//! - each profile's manifest and segments one level beneath, under
//!   `{profile}/`

use crate::job::EpisodeRef;

/// Prefix under which one job's whole HLS package lives.
pub fn hls_package_prefix(movie_id: &str, episode: Option<&EpisodeRef>) -> String {
    match episode {
        Some(ep) => format!(
            "hls/movies/{}/ss{}/ep{}",
            movie_id, ep.season_number, ep.episode_number
        ),
        None => format!("hls/movies/{}", movie_id),
    }
}

/// Key of the top-level (master) manifest.
pub fn hls_master_key(movie_id: &str, episode: Option<&EpisodeRef>) -> String {
    format!("{}/master.m3u8", hls_package_prefix(movie_id, episode))
}

/// Key of one profile's variant manifest.
pub fn hls_variant_key(movie_id: &str, episode: Option<&EpisodeRef>, profile: &str) -> String {
    format!(
        "{}/{}/index.m3u8",
        hls_package_prefix(movie_id, episode),
        profile
    )
}

/// Key of a published subtitle track.
pub fn subtitle_key(movie_id: &str, episode: Option<&EpisodeRef>, language: &str) -> String {
    match episode {
        Some(ep) => format!(
            "subtitles/movies/{}/ss{}/ep{}/{}.vtt",
            movie_id, ep.season_number, ep.episode_number, language
        ),
        None => format!("subtitles/movies/{}/{}.vtt", movie_id, language),
    }
}
