//! FFprobe duration and stream probing.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format, narrowed to what we read.
#[derive(Debug, Deserialize)]
struct FfprobeReport {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probe the overall duration of a media file, in seconds.
pub async fn probe_duration(ffprobe: &Path, input: &Path) -> MediaResult<f64> {
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let output = Command::new(ffprobe)
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::probe_failed(
            "ffprobe failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    parse_duration_report(&output.stdout)
}

/// Probe whether the input carries at least one audio stream.
///
/// The prober is asked to list audio stream indices; empty output means
/// no audio.
pub async fn has_audio_stream(ffprobe: &Path, input: &Path) -> MediaResult<bool> {
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "a",
            "-show_entries",
            "stream=index",
            "-of",
            "csv=p=0",
        ])
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::probe_failed(
            "ffprobe stream listing failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    Ok(parse_audio_index_listing(&String::from_utf8_lossy(
        &output.stdout,
    )))
}

fn parse_duration_report(stdout: &[u8]) -> MediaResult<f64> {
    let report: FfprobeReport = serde_json::from_slice(stdout)?;
    report
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaError::probe_failed("no duration in ffprobe report", None))
}

fn parse_audio_index_listing(stdout: &str) -> bool {
    stdout.lines().any(|l| !l.trim().is_empty())
}
