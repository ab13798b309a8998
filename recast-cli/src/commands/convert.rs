//! Implementation of the `mp4` and `mp3` subcommands.
//!
//! Both resolve the source, run one conversion through recast-core and move
//! the result into the output directory.

use crate::cli::{GlobalArgs, Mp3Args, Mp4Args, SourceArgs};
use crate::config::core_config;
use crate::error::{CliErrorContext, CliResult};

use recast_core::external::FfmpegSpawner;
use recast_core::{
    ConversionTarget, CoreConfig, Mp3Options, Mp4Options, PlatformExtractor, SidecarSpawner,
    YtDlpExtractor, acquire, convert, locate_ffmpeg,
};

use log::info;
use std::path::{Path, PathBuf};

impl Mp4Args {
    pub fn options(&self) -> Mp4Options {
        Mp4Options {
            resolution: self.resolution,
            crf: self.crf,
            audio_bitrate_kbps: self.audio_bitrate,
            preset: self.preset,
            normalize_audio: self.normalize,
        }
    }
}

impl Mp3Args {
    pub fn options(&self) -> Mp3Options {
        Mp3Options {
            bitrate_kbps: self.bitrate,
            normalize_audio: self.normalize,
        }
    }
}

/// Runs `recast mp4`. Returns the path of the written file.
pub fn run_mp4(global: &GlobalArgs, args: &Mp4Args) -> CliResult<PathBuf> {
    run_with_system_tools(global, &args.source, ConversionTarget::Mp4(args.options()))
}

/// Runs `recast mp3`. Returns the path of the written file.
pub fn run_mp3(global: &GlobalArgs, args: &Mp3Args) -> CliResult<PathBuf> {
    run_with_system_tools(global, &args.source, ConversionTarget::Mp3(args.options()))
}

fn run_with_system_tools(
    global: &GlobalArgs,
    source: &SourceArgs,
    target: ConversionTarget,
) -> CliResult<PathBuf> {
    // Fail on bad options before touching the network or ffmpeg
    target.validate()?;

    let mut config = core_config(global);
    config.ffmpeg_path = Some(locate_ffmpeg(&config)?);
    let extractor = YtDlpExtractor::from_config(&config);
    run_conversion(&config, &SidecarSpawner, &extractor, source, &target)
}

/// Acquires the source described by `source`, converts it and persists the
/// output into `source.output_dir`.
pub fn run_conversion<S: FfmpegSpawner, E: PlatformExtractor>(
    config: &CoreConfig,
    spawner: &S,
    extractor: &E,
    source: &SourceArgs,
    target: &ConversionTarget,
) -> CliResult<PathBuf> {
    target.validate()?;
    let input = source
        .input_source()
        .cli_context("No source given; use --input, --url or --platform-url")?;

    let media = acquire(config, extractor, input)?;
    let output = convert(spawner, config, &media, target)?;
    let saved = persist(output, &source.output_dir)?;

    recast_core::progress_reporting::success(&format!("Saved {}", saved.display()));
    info!("Output written to {}", saved.display());
    Ok(saved)
}

fn persist(output: recast_core::ConversionOutput, dir: &Path) -> CliResult<PathBuf> {
    output
        .persist_to(dir)
        .cli_with_context(|| format!("Failed to write output into {}", dir.display()))
}
