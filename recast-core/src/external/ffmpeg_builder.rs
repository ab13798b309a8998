//! FFmpeg command builder utilities
//!
//! Builds the two fixed-shape commands Recast runs:
//!
//! ```text
//! MP4: ffmpeg -hide_banner -y -i IN [-vf scale=-2:H] -c:v libx264 -preset P -crf N
//!             -c:a aac -b:a Kk [-af loudnorm=...] -movflags +faststart OUT
//! MP3: ffmpeg -hide_banner -y -i IN [-af loudnorm=...] -vn -c:a libmp3lame -b:a Kk OUT
//! ```

use std::ffi::OsStr;
use std::path::Path;

use ffmpeg_sidecar::command::FfmpegCommand;

use crate::options::{Mp3Options, Mp4Options};

/// EBU R128 single-pass loudness normalization used when the user asks for it.
pub const LOUDNORM_FILTER: &str = "loudnorm=I=-16:TP=-1.5:LRA=11";

/// Builder for `FFmpeg` commands sharing the common leading flags
pub struct FfmpegCommandBuilder {
    cmd: FfmpegCommand,
}

impl FfmpegCommandBuilder {
    /// Creates a builder for the given ffmpeg binary
    #[must_use]
    pub fn new<S: AsRef<OsStr>>(ffmpeg_path: S) -> Self {
        Self {
            cmd: FfmpegCommand::new_with_path(ffmpeg_path),
        }
    }

    /// Builds the command with the banner hidden and the output overwritten
    #[must_use]
    pub fn build(mut self) -> FfmpegCommand {
        self.cmd.arg("-hide_banner").arg("-y");
        self.cmd
    }
}

/// Builder for comma-joined filter chains (`-vf` / `-af`)
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<String>,
}

impl FilterChain {
    /// Creates a new empty filter chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter to the chain; empty strings are ignored
    #[must_use]
    pub fn add_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        if !filter.is_empty() {
            self.filters.push(filter);
        }
        self
    }

    /// Adds a filter only when `condition` holds
    #[must_use]
    pub fn add_filter_if(self, condition: bool, filter: impl Into<String>) -> Self {
        if condition { self.add_filter(filter) } else { self }
    }

    /// Builds the filter chain into a single filter string
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(","))
        }
    }
}

/// Scale to a fixed height keeping aspect ratio; width rounded to an even number.
#[must_use]
pub fn scale_filter(height: u32) -> String {
    format!("scale=-2:{height}")
}

/// Command producing an H.264 + AAC MP4.
#[must_use]
pub fn build_mp4_command(
    ffmpeg_path: &Path,
    input: &Path,
    output: &Path,
    opts: &Mp4Options,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommandBuilder::new(ffmpeg_path).build();
    cmd.input(input.to_string_lossy().as_ref());

    let video_filters = FilterChain::new()
        .add_filter(opts.resolution.height().map(scale_filter).unwrap_or_default())
        .build();
    if let Some(ref filters) = video_filters {
        cmd.args(["-vf", filters.as_str()]);
    }

    cmd.args(["-c:v", "libx264"]);
    cmd.args(["-preset", opts.preset.as_str()]);
    cmd.args(["-crf", opts.crf.to_string().as_str()]);
    cmd.args(["-c:a", "aac"]);
    cmd.args(["-b:a", format!("{}k", opts.audio_bitrate_kbps).as_str()]);

    let audio_filters = FilterChain::new()
        .add_filter_if(opts.normalize_audio, LOUDNORM_FILTER)
        .build();
    if let Some(ref filters) = audio_filters {
        cmd.args(["-af", filters.as_str()]);
    }

    cmd.args(["-movflags", "+faststart"]);
    cmd.output(output.to_string_lossy().as_ref());
    cmd
}

/// Command extracting the audio track to MP3.
#[must_use]
pub fn build_mp3_command(
    ffmpeg_path: &Path,
    input: &Path,
    output: &Path,
    opts: &Mp3Options,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommandBuilder::new(ffmpeg_path).build();
    cmd.input(input.to_string_lossy().as_ref());

    let audio_filters = FilterChain::new()
        .add_filter_if(opts.normalize_audio, LOUDNORM_FILTER)
        .build();
    if let Some(ref filters) = audio_filters {
        cmd.args(["-af", filters.as_str()]);
    }

    cmd.arg("-vn");
    cmd.args(["-c:a", "libmp3lame"]);
    cmd.args(["-b:a", format!("{}k", opts.bitrate_kbps).as_str()]);
    cmd.output(output.to_string_lossy().as_ref());
    cmd
}

/// Arguments of a built command, for logging and tests.
#[must_use]
pub fn command_args(cmd: &mut FfmpegCommand) -> Vec<String> {
    cmd.as_inner()
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Preset, Resolution};

    fn args_of(mut cmd: FfmpegCommand) -> Vec<String> {
        command_args(&mut cmd)
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    fn position(args: &[String], needle: &str) -> usize {
        args.iter()
            .position(|a| a == needle)
            .unwrap_or_else(|| panic!("{needle} missing from {args:?}"))
    }

    #[test]
    fn test_filter_chain_empty() {
        assert_eq!(FilterChain::new().build(), None);
        assert_eq!(FilterChain::new().add_filter("").build(), None);
        assert_eq!(FilterChain::new().add_filter_if(false, "loudnorm").build(), None);
    }

    #[test]
    fn test_filter_chain_joins_with_commas() {
        let chain = FilterChain::new()
            .add_filter("scale=-2:720")
            .add_filter_if(true, "fps=30")
            .build();
        assert_eq!(chain, Some("scale=-2:720,fps=30".to_string()));
    }

    #[test]
    fn test_mp4_command_default_shape() {
        let args = args_of(build_mp4_command(
            Path::new("ffmpeg"),
            Path::new("/tmp/in.mkv"),
            Path::new("/tmp/out.mp4"),
            &Mp4Options::default(),
        ));

        assert!(args.contains(&"-hide_banner".to_string()));
        assert!(args.contains(&"-y".to_string()));
        assert!(has_pair(&args, "-i", "/tmp/in.mkv"));
        assert!(has_pair(&args, "-c:v", "libx264"));
        assert!(has_pair(&args, "-preset", "medium"));
        assert!(has_pair(&args, "-crf", "23"));
        assert!(has_pair(&args, "-c:a", "aac"));
        assert!(has_pair(&args, "-b:a", "160k"));
        assert!(has_pair(&args, "-movflags", "+faststart"));
        assert!(!args.contains(&"-vf".to_string()));
        assert!(!args.contains(&"-af".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/out.mp4"));
    }

    #[test]
    fn test_mp4_command_with_scale_and_loudnorm() {
        let opts = Mp4Options {
            resolution: Resolution::P480,
            crf: 28,
            audio_bitrate_kbps: 96,
            preset: Preset::Veryfast,
            normalize_audio: true,
        };
        let args = args_of(build_mp4_command(
            Path::new("/opt/ffmpeg"),
            Path::new("in.mov"),
            Path::new("out.mp4"),
            &opts,
        ));

        assert!(has_pair(&args, "-vf", "scale=-2:480"));
        assert!(has_pair(&args, "-af", LOUDNORM_FILTER));
        assert!(has_pair(&args, "-preset", "veryfast"));
        assert!(has_pair(&args, "-crf", "28"));
        assert!(has_pair(&args, "-b:a", "96k"));

        // Input first, filters before codecs, faststart right before the output
        assert!(position(&args, "-i") < position(&args, "-vf"));
        assert!(position(&args, "-vf") < position(&args, "-c:v"));
        assert!(position(&args, "-b:a") < position(&args, "-af"));
        assert_eq!(position(&args, "+faststart") + 1, args.len() - 1);
    }

    #[test]
    fn test_mp3_command_shape() {
        let args = args_of(build_mp3_command(
            Path::new("ffmpeg"),
            Path::new("talk.wav"),
            Path::new("talk.mp3"),
            &Mp3Options::default(),
        ));

        assert!(has_pair(&args, "-i", "talk.wav"));
        assert!(args.contains(&"-vn".to_string()));
        assert!(has_pair(&args, "-c:a", "libmp3lame"));
        assert!(has_pair(&args, "-b:a", "192k"));
        assert!(!args.contains(&"-af".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("talk.mp3"));
    }

    #[test]
    fn test_mp3_command_loudnorm_precedes_codec() {
        let opts = Mp3Options {
            bitrate_kbps: 320,
            normalize_audio: true,
        };
        let args = args_of(build_mp3_command(
            Path::new("ffmpeg"),
            Path::new("a.flac"),
            Path::new("b.mp3"),
            &opts,
        ));

        assert!(has_pair(&args, "-af", LOUDNORM_FILTER));
        assert!(position(&args, "-af") < position(&args, "-vn"));
        assert!(has_pair(&args, "-b:a", "320k"));
    }

    #[test]
    fn test_builder_leading_flags() {
        let args = args_of(FfmpegCommandBuilder::new("ffmpeg").build());
        assert!(args.contains(&"-hide_banner".to_string()));
        assert!(position(&args, "-hide_banner") < position(&args, "-y"));
    }
}
