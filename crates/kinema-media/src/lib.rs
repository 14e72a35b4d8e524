//! FFmpeg CLI wrapper for HLS packaging.
//!
//! This crate provides:
//! - Three-tier executable resolution (config, environment, PATH)
//! - Duration and audio-presence probing via ffprobe
//! - Type-safe construction of the multi-rendition HLS invocation
//! - Progress parsing from the encoder's diagnostic stream
//! - A subprocess runner with cancellation support via tokio

pub mod error;
pub mod hls;
pub mod probe;
pub mod progress;
pub mod runner;
pub mod tools;

pub use error::{MediaError, MediaResult};
pub use hls::HlsEncode;
pub use probe::{has_audio_stream, probe_duration};
pub use progress::ProgressEstimator;
pub use runner::EncoderRunner;
pub use tools::{resolve_tool, EncoderTools};
