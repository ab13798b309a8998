// recast-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{ArgGroup, Args, Parser, Subcommand};
use recast_core::options::{
    AUDIO_BITRATES_KBPS, CRF_MAX, CRF_MIN, DEFAULT_CRF, DEFAULT_MP3_KBPS, DEFAULT_MP4_AUDIO_KBPS,
};
use recast_core::{InputSource, Preset, Resolution};
use std::net::SocketAddr;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Recast: convert media files to MP4 or MP3",
    long_about = "Converts uploads, local files and URLs to H.264/AAC MP4 or MP3 using ffmpeg via the recast-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Show debug output, including ffmpeg's log
    #[arg(short, long, global = true, env = "RECAST_VERBOSE")]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long, global = true, value_name = "FILE", env = "RECAST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// ffmpeg binary to use instead of the one found on PATH
    #[arg(long, global = true, value_name = "PATH", env = "RECAST_FFMPEG_PATH")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Download a static ffmpeg build when none is found
    #[arg(long, global = true, env = "RECAST_DOWNLOAD_FFMPEG")]
    pub download_ffmpeg: bool,

    /// yt-dlp binary used for streaming-platform URLs
    #[arg(long, global = true, value_name = "PATH", env = "RECAST_YTDLP_PATH")]
    pub ytdlp_path: Option<PathBuf>,

    /// Directory for temporary files (defaults to the system temp dir)
    #[arg(long, global = true, value_name = "DIR", env = "RECAST_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Allow fetching from streaming platforms with yt-dlp.
    /// You are responsible for having the rights to the content.
    #[arg(long, global = true, env = "RECAST_ALLOW_PLATFORM_SOURCES")]
    pub allow_platform_sources: bool,

    /// Timeout for direct URL downloads, in seconds
    #[arg(long, global = true, value_name = "SECONDS", env = "RECAST_HTTP_TIMEOUT")]
    pub http_timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts a video to H.264 + AAC MP4
    Mp4(Mp4Args),
    /// Extracts the audio track as MP3
    Mp3(Mp3Args),
    /// Serves the browser UI
    Serve(ServeArgs),
    /// Reports whether ffmpeg and yt-dlp are available
    Check,
}

/// Where the media comes from. Exactly one is required.
#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["input", "url", "platform_url"]),
))]
pub struct SourceArgs {
    /// Local media file
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Direct link to a media file
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Streaming-platform page (needs --allow-platform-sources)
    #[arg(long = "platform-url", value_name = "URL")]
    pub platform_url: Option<String>,

    /// Directory where the converted file is written
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

impl SourceArgs {
    /// The chosen source as a core [`InputSource`].
    pub fn input_source(&self) -> Option<InputSource> {
        if let Some(path) = &self.input {
            Some(InputSource::Local(path.clone()))
        } else if let Some(url) = &self.url {
            Some(InputSource::DirectUrl(url.clone()))
        } else {
            self.platform_url.clone().map(InputSource::PlatformUrl)
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct Mp4Args {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output height: original, 360p, 480p, 720p or 1080p
    #[arg(short, long, value_name = "RES", default_value = "original")]
    pub resolution: Resolution,

    /// x264 quality (lower is better)
    #[arg(
        long,
        value_name = "CRF",
        default_value_t = DEFAULT_CRF,
        value_parser = clap::value_parser!(u8).range(i64::from(CRF_MIN)..=i64::from(CRF_MAX))
    )]
    pub crf: u8,

    /// AAC bitrate in kbps
    #[arg(long, value_name = "KBPS", default_value_t = DEFAULT_MP4_AUDIO_KBPS, value_parser = parse_bitrate)]
    pub audio_bitrate: u32,

    /// x264 preset (ultrafast .. veryslow)
    #[arg(short, long, value_name = "PRESET", default_value = "medium")]
    pub preset: Preset,

    /// Normalize loudness (EBU R128)
    #[arg(long)]
    pub normalize: bool,
}

#[derive(Args, Debug, Clone)]
pub struct Mp3Args {
    #[command(flatten)]
    pub source: SourceArgs,

    /// MP3 bitrate in kbps
    #[arg(short, long, value_name = "KBPS", default_value_t = DEFAULT_MP3_KBPS, value_parser = parse_bitrate)]
    pub bitrate: u32,

    /// Normalize loudness (EBU R128)
    #[arg(long)]
    pub normalize: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, value_name = "ADDR", default_value = "127.0.0.1:8080", env = "RECAST_BIND")]
    pub bind: SocketAddr,

    /// Largest accepted upload, in MiB
    #[arg(long, value_name = "MIB", env = "RECAST_MAX_UPLOAD_MB")]
    pub max_upload_mb: Option<usize>,
}

fn parse_bitrate(value: &str) -> Result<u32, String> {
    let kbps: u32 = value
        .trim()
        .trim_end_matches(['k', 'K'])
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if AUDIO_BITRATES_KBPS.contains(&kbps) {
        Ok(kbps)
    } else {
        let allowed: Vec<String> = AUDIO_BITRATES_KBPS.iter().map(u32::to_string).collect();
        Err(format!("must be one of {}", allowed.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp4_defaults() {
        let cli = Cli::try_parse_from(["recast", "mp4", "--input", "clip.mov"]).unwrap();
        let Commands::Mp4(args) = cli.command else {
            panic!("expected mp4 subcommand");
        };
        assert_eq!(args.resolution, Resolution::Original);
        assert_eq!(args.crf, 23);
        assert_eq!(args.audio_bitrate, 160);
        assert_eq!(args.preset, Preset::Medium);
        assert!(!args.normalize);
        assert_eq!(args.source.output_dir, PathBuf::from("."));
        assert_eq!(
            args.source.input_source(),
            Some(InputSource::Local(PathBuf::from("clip.mov")))
        );
    }

    #[test]
    fn test_mp3_options_and_global_flags() {
        let cli = Cli::try_parse_from([
            "recast",
            "mp3",
            "--url",
            "https://example.com/a.wav",
            "--bitrate",
            "320k",
            "--normalize",
            "--verbose",
            "--http-timeout",
            "5",
        ])
        .unwrap();
        assert!(cli.global.verbose);
        assert_eq!(cli.global.http_timeout, Some(5));
        let Commands::Mp3(args) = cli.command else {
            panic!("expected mp3 subcommand");
        };
        assert_eq!(args.bitrate, 320);
        assert!(args.normalize);
        assert_eq!(
            args.source.input_source(),
            Some(InputSource::DirectUrl("https://example.com/a.wav".into()))
        );
    }

    #[test]
    fn test_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["recast", "mp3"]).is_err());
        assert!(
            Cli::try_parse_from(["recast", "mp3", "--input", "a.mp4", "--url", "https://x.io/a.mp4"])
                .is_err()
        );
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(Cli::try_parse_from(["recast", "mp4", "-i", "a.mov", "--crf", "31"]).is_err());
        assert!(Cli::try_parse_from(["recast", "mp4", "-i", "a.mov", "--crf", "17"]).is_err());
        assert!(Cli::try_parse_from(["recast", "mp3", "-i", "a.wav", "--bitrate", "100"]).is_err());
        assert!(Cli::try_parse_from(["recast", "mp4", "-i", "a.mov", "--resolution", "4k"]).is_err());
    }

    #[test]
    fn test_resolution_and_preset_parse() {
        let cli = Cli::try_parse_from([
            "recast", "mp4", "-i", "a.mov", "--resolution", "720p", "--preset", "veryslow",
        ])
        .unwrap();
        let Commands::Mp4(args) = cli.command else {
            panic!("expected mp4 subcommand");
        };
        assert_eq!(args.resolution, Resolution::P720);
        assert_eq!(args.preset, Preset::Veryslow);
    }
}
