//! Construction of the multi-rendition HLS encoder invocation.
//!
//! One invocation splits the input into N scaled copies, encodes each at
//! its fixed target bitrate, optionally muxes a shared AAC audio stream
//! into every variant, and emits a video-on-demand package: one variant
//! manifest plus fixed-duration segments per rendition under `{profile}/`,
//! and a top-level `master.m3u8` referencing all of them.

use std::path::{Path, PathBuf};

use kinema_models::QualityProfile;

/// Fixed segment duration in seconds.
pub const SEGMENT_SECONDS: u32 = 6;

/// Fixed keyframe interval in frames, aligned with segment boundaries.
const KEYFRAME_INTERVAL: u32 = 48;

/// A fully specified HLS packaging invocation.
#[derive(Debug, Clone)]
pub struct HlsEncode {
    input: PathBuf,
    ladder: Vec<QualityProfile>,
    include_audio: bool,
}

impl HlsEncode {
    /// Create an invocation for the given input and resolved ladder.
    ///
    /// The ladder is expected in descending resolution order; that order
    /// becomes the master-manifest stream order.
    pub fn new(input: impl AsRef<Path>, ladder: Vec<QualityProfile>, include_audio: bool) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            ladder,
            include_audio,
        }
    }

    /// The filter graph splitting the input into one scaled copy per
    /// rendition. Height is fixed per profile; width follows the source
    /// aspect ratio rounded to an even value (`scale=-2:h`).
    fn filter_graph(&self) -> String {
        let n = self.ladder.len();
        let mut graph = format!("[0:v]split={}", n);
        for i in 0..n {
            graph.push_str(&format!("[v{}]", i));
        }
        for (i, profile) in self.ladder.iter().enumerate() {
            graph.push_str(&format!(";[v{}]scale=-2:{}[v{}out]", i, profile.height, i));
        }
        graph
    }

    /// The variant map naming each rendition after its profile, which
    /// places its manifest and segments under `{profile}/`.
    fn var_stream_map(&self) -> String {
        self.ladder
            .iter()
            .enumerate()
            .map(|(i, profile)| {
                if self.include_audio {
                    format!("v:{},a:{},name:{}", i, i, profile.name)
                } else {
                    format!("v:{},name:{}", i, profile.name)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the complete encoder argument list.
    ///
    /// Paths in the output pattern are relative; the invocation must run
    /// with the job's working directory as the process cwd.
    pub fn build_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-i".into(),
            self.input.to_string_lossy().into_owned(),
            "-filter_complex".into(),
            self.filter_graph(),
        ];

        for (i, profile) in self.ladder.iter().enumerate() {
            let kbps = profile.video_bitrate_kbps;
            args.extend([
                "-map".into(),
                format!("[v{}out]", i),
                format!("-c:v:{}", i),
                "libx264".into(),
                format!("-b:v:{}", i),
                format!("{}k", kbps),
                format!("-maxrate:v:{}", i),
                format!("{}k", kbps * 107 / 100),
                format!("-bufsize:v:{}", i),
                format!("{}k", kbps * 3 / 2),
                format!("-g:v:{}", i),
                KEYFRAME_INTERVAL.to_string(),
            ]);
        }

        if self.include_audio {
            // One shared audio stream muxed into every variant with fixed
            // codec/rate/channel parameters.
            for _ in &self.ladder {
                args.extend(["-map".into(), "a:0".into()]);
            }
            args.extend([
                "-c:a".into(),
                "aac".into(),
                "-b:a".into(),
                "128k".into(),
                "-ar".into(),
                "48000".into(),
                "-ac".into(),
                "2".into(),
            ]);
        }

        args.extend([
            "-f".into(),
            "hls".into(),
            "-hls_time".into(),
            SEGMENT_SECONDS.to_string(),
            "-hls_playlist_type".into(),
            "vod".into(),
            "-hls_flags".into(),
            "independent_segments".into(),
            "-hls_segment_filename".into(),
            "%v/segment_%03d.ts".into(),
            "-master_pl_name".into(),
            "master.m3u8".into(),
            "-var_stream_map".into(),
            self.var_stream_map(),
            "%v/index.m3u8".into(),
        ]);

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinema_models::resolve_ladder;

    fn ladder(names: &[&str]) -> Vec<QualityProfile> {
        resolve_ladder(&names.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn builds_one_scaled_copy_per_profile() {
        let encode = HlsEncode::new("source.mkv", ladder(&["1080", "720"]), true);
        let args = encode.build_args();

        let graph = args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1].clone();
        assert!(graph.starts_with("[0:v]split=2[v0][v1]"));
        assert!(graph.contains("scale=-2:1080"));
        assert!(graph.contains("scale=-2:720"));
    }

    #[test]
    fn audio_present_maps_shared_stream_into_every_variant() {
        let encode = HlsEncode::new("source.mkv", ladder(&["1080", "720"]), true);
        let args = encode.build_args();

        let audio_maps = args.iter().filter(|a| a.as_str() == "a:0").count();
        assert_eq!(audio_maps, 2);

        let vsm = args[args.iter().position(|a| a == "-var_stream_map").unwrap() + 1].clone();
        assert_eq!(vsm, "v:0,a:0,name:1080 v:1,a:1,name:720");
    }

    #[test]
    fn silent_source_omits_audio_mapping_entirely() {
        let encode = HlsEncode::new("source.mkv", ladder(&["1080", "720", "480"]), false);
        let args = encode.build_args();

        assert!(!args.iter().any(|a| a == "a:0"));
        assert!(!args.iter().any(|a| a == "-c:a"));

        let vsm = args[args.iter().position(|a| a == "-var_stream_map").unwrap() + 1].clone();
        assert_eq!(vsm, "v:0,name:1080 v:1,name:720 v:2,name:480");
    }

    #[test]
    fn package_is_vod_with_fixed_segment_duration() {
        let encode = HlsEncode::new("source.mkv", ladder(&["720"]), true);
        let args = encode.build_args();

        let time_idx = args.iter().position(|a| a == "-hls_time").unwrap();
        assert_eq!(args[time_idx + 1], "6");

        let type_idx = args.iter().position(|a| a == "-hls_playlist_type").unwrap();
        assert_eq!(args[type_idx + 1], "vod");

        assert!(args.contains(&"independent_segments".to_string()));
        assert_eq!(args.last().unwrap(), "%v/index.m3u8");
    }

    #[test]
    fn bitrates_follow_the_fixed_ladder() {
        let encode = HlsEncode::new("source.mkv", ladder(&["1080", "720", "480"]), false);
        let args = encode.build_args();

        assert!(args.contains(&"5000k".to_string()));
        assert!(args.contains(&"2800k".to_string()));
        assert!(args.contains(&"1400k".to_string()));
    }

    #[test]
    fn overwrite_flag_is_explicit() {
        let encode = HlsEncode::new("source.mkv", ladder(&["720"]), false);
        assert_eq!(encode.build_args()[0], "-y");
    }
}
