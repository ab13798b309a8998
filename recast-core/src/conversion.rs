//! Conversion pipeline: source file in, one output file out.
//!
//! Each conversion creates its output as a temp file, builds the ffmpeg
//! command for the chosen target and runs it. The result is handed back as a
//! [`ConversionOutput`] that either gets persisted to a directory or read
//! into memory for download.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempPath;

use crate::acquisition::AcquiredMedia;
use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, build_mp3_command, build_mp4_command, ffmpeg_binary, run_ffmpeg};
use crate::naming::{mp3_output_name, mp4_output_name};
use crate::options::{ConversionTarget, Mp3Options, Mp4Options};
use crate::temp_files::create_temp_file;

/// A finished conversion.
#[derive(Debug)]
pub struct ConversionOutput {
    temp: TempPath,
    file_name: String,
    mime_type: &'static str,
    size: u64,
    elapsed: Duration,
}

impl ConversionOutput {
    /// Location of the (still temporary) output file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.temp
    }

    /// Suggested file name for the download
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Output size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Wall-clock time the encoder took
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Reads the output into memory. The temp file is removed afterwards.
    pub fn read_bytes(self) -> CoreResult<Vec<u8>> {
        Ok(std::fs::read(&self.temp)?)
    }

    /// Moves the output to `dir/<file_name>` and returns the final path.
    ///
    /// Falls back to copying when the temp file is on another filesystem.
    pub fn persist_to(self, dir: &Path) -> CoreResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let dest = dir.join(&self.file_name);
        match self.temp.persist(&dest) {
            Ok(()) => {}
            Err(err) => {
                log::debug!("Rename into {} failed ({}), copying instead", dir.display(), err.error);
                std::fs::copy(&err.path, &dest)?;
            }
        }
        Ok(dest)
    }
}

/// Converts `media` to an H.264 + AAC MP4.
pub fn transcode_to_mp4<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    media: &AcquiredMedia,
    opts: &Mp4Options,
) -> CoreResult<ConversionOutput> {
    opts.validate()?;
    crate::progress_reporting::section("Converting to MP4");
    crate::progress_reporting::status("Resolution", &opts.resolution.to_string(), false);
    crate::progress_reporting::status("CRF", &opts.crf.to_string(), false);
    crate::progress_reporting::status("Audio bitrate", &format!("{}k", opts.audio_bitrate_kbps), false);
    crate::progress_reporting::status("Preset", opts.preset.as_str(), false);
    crate::progress_reporting::status("Normalize audio", yes_no(opts.normalize_audio), false);

    let output = create_temp_file(config, "output", ".mp4")?.into_temp_path();
    let cmd = build_mp4_command(&ffmpeg_binary(config), media.path(), &output, opts);
    finish(
        spawner,
        cmd,
        output,
        mp4_output_name(media.display_name(), opts),
        "video/mp4",
        media.size(),
    )
}

/// Extracts the audio of `media` to MP3.
pub fn extract_to_mp3<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    media: &AcquiredMedia,
    opts: &Mp3Options,
) -> CoreResult<ConversionOutput> {
    opts.validate()?;
    crate::progress_reporting::section("Extracting MP3");
    crate::progress_reporting::status("Bitrate", &format!("{}k", opts.bitrate_kbps), false);
    crate::progress_reporting::status("Normalize audio", yes_no(opts.normalize_audio), false);

    let output = create_temp_file(config, "output", ".mp3")?.into_temp_path();
    let cmd = build_mp3_command(&ffmpeg_binary(config), media.path(), &output, opts);
    finish(
        spawner,
        cmd,
        output,
        mp3_output_name(media.display_name(), opts),
        "audio/mpeg",
        media.size(),
    )
}

/// Runs whichever conversion `target` asks for.
pub fn convert<S: FfmpegSpawner>(
    spawner: &S,
    config: &CoreConfig,
    media: &AcquiredMedia,
    target: &ConversionTarget,
) -> CoreResult<ConversionOutput> {
    match target {
        ConversionTarget::Mp4(opts) => transcode_to_mp4(spawner, config, media, opts),
        ConversionTarget::Mp3(opts) => extract_to_mp3(spawner, config, media, opts),
    }
}

fn finish<S: FfmpegSpawner>(
    spawner: &S,
    cmd: ffmpeg_sidecar::command::FfmpegCommand,
    output: TempPath,
    file_name: String,
    mime_type: &'static str,
    input_size: u64,
) -> CoreResult<ConversionOutput> {
    let start = Instant::now();
    crate::progress_reporting::processing(&format!("Encoding {file_name}"));
    let run = match run_ffmpeg(spawner, cmd) {
        Ok(run) => run,
        Err(e) => {
            crate::progress_reporting::error(&e.to_string());
            return Err(e);
        }
    };
    let elapsed = start.elapsed();
    crate::progress_reporting::debug(&format!("ffmpeg wrote {} log lines", run.line_count));

    let size = std::fs::metadata(&output)?.len();
    crate::progress_reporting::conversion_summary(
        &file_name,
        elapsed,
        run.duration_secs,
        input_size,
        size,
    );

    Ok(ConversionOutput {
        temp: output,
        file_name,
        mime_type,
        size,
        elapsed,
    })
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
