//! Encoder/prober executable resolution.

use std::path::{Path, PathBuf};

use crate::error::{MediaError, MediaResult};

/// Environment variable overriding the encoder location.
pub const FFMPEG_ENV: &str = "KINEMA_FFMPEG_PATH";
/// Environment variable overriding the prober location.
pub const FFPROBE_ENV: &str = "KINEMA_FFPROBE_PATH";

/// Resolved locations of the external encoder tool family.
#[derive(Debug, Clone)]
pub struct EncoderTools {
    /// Encoder executable
    pub ffmpeg: PathBuf,
    /// Prober executable
    pub ffprobe: PathBuf,
}

impl EncoderTools {
    /// Resolve both tools from optional configured paths.
    pub fn resolve(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> MediaResult<Self> {
        Ok(Self {
            ffmpeg: resolve_tool(ffmpeg, FFMPEG_ENV, "ffmpeg")?,
            ffprobe: resolve_tool(ffprobe, FFPROBE_ENV, "ffprobe")?,
        })
    }
}

/// Resolve one tool with three-tier fallback: explicit configuration,
/// then the named environment variable, then the bare command name looked
/// up on the search path.
///
/// A configured or environment-supplied absolute path that does not exist
/// on disk fails fast; a missing PATH entry falls back to the bare name so
/// the spawn itself reports the final verdict.
pub fn resolve_tool(
    configured: Option<&Path>,
    env_var: &str,
    default_name: &str,
) -> MediaResult<PathBuf> {
    if let Some(path) = configured {
        return check_absolute(default_name, path);
    }

    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return check_absolute(default_name, Path::new(value.trim()));
        }
    }

    Ok(which::which(default_name).unwrap_or_else(|_| PathBuf::from(default_name)))
}

fn check_absolute(tool: &str, path: &Path) -> MediaResult<PathBuf> {
    if path.is_absolute() && !path.exists() {
        return Err(MediaError::executable_not_found(tool, path));
    }
    Ok(path.to_path_buf())
}
