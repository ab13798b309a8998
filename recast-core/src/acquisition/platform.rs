//! Streaming-platform URLs resolved by an external extractor (yt-dlp).
//!
//! The extractor is treated as a black box: it receives a page URL and a
//! destination directory and must leave exactly one media file behind.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use url::Url;

use crate::acquisition::AcquiredMedia;
use crate::acquisition::http::parse_media_url;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult, command_start_error};
use crate::temp_files::create_temp_dir;

/// Resolves a platform page URL to a downloaded media file.
pub trait PlatformExtractor {
    /// Downloads the media behind `url` into `dest_dir` and returns its path.
    fn extract(&self, url: &Url, dest_dir: &Path) -> CoreResult<PathBuf>;
}

/// `PlatformExtractor` backed by the yt-dlp binary.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: PathBuf,
    ffmpeg_location: Option<PathBuf>,
}

impl YtDlpExtractor {
    #[must_use]
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            ffmpeg_location: None,
        }
    }

    /// Uses the configured yt-dlp and hands it the ffmpeg recast resolved,
    /// needed to merge separate video and audio streams.
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        let extractor = Self::new(config.ytdlp_path.clone());
        match &config.ffmpeg_path {
            Some(ffmpeg) => extractor.with_ffmpeg_location(ffmpeg.clone()),
            None => extractor,
        }
    }

    /// Points yt-dlp at a specific ffmpeg binary.
    ///
    /// Bare command names are left to yt-dlp's own PATH lookup.
    #[must_use]
    pub fn with_ffmpeg_location(mut self, ffmpeg: PathBuf) -> Self {
        let has_dir = ffmpeg.parent().is_some_and(|p| !p.as_os_str().is_empty());
        self.ffmpeg_location = has_dir.then_some(ffmpeg);
        self
    }

    /// Arguments passed to yt-dlp for `url`, writing into `dest_dir`.
    #[must_use]
    pub fn build_args(&self, url: &Url, dest_dir: &Path) -> Vec<String> {
        let template = dest_dir.join("%(title).120B [%(id)s].%(ext)s");
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "--restrict-filenames".to_string(),
            "-f".to_string(),
            "bv*+ba/b".to_string(),
        ];
        if let Some(ffmpeg) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.to_string_lossy().to_string());
        }
        args.extend([
            "-o".to_string(),
            template.to_string_lossy().to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            url.to_string(),
        ]);
        args
    }
}

impl PlatformExtractor for YtDlpExtractor {
    fn extract(&self, url: &Url, dest_dir: &Path) -> CoreResult<PathBuf> {
        let cmd_name = self.binary.to_string_lossy().to_string();
        let args = self.build_args(url, dest_dir);
        log::debug!("Running {} {}", cmd_name, args.join(" "));

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    CoreError::DependencyNotFound(cmd_name.clone())
                } else {
                    command_start_error(cmd_name.clone(), e)
                }
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            log::debug!(target: "ytdlp_log", "{line}");
        }

        if !output.status.success() {
            let message = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("no error output")
                .to_string();
            return Err(CoreError::ExternalTool(format!(
                "{cmd_name} exited with {}: {message}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let produced = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| CoreError::ExternalTool(format!("{cmd_name} did not report an output file")))?;

        if !produced.is_file() {
            return Err(CoreError::ExternalTool(format!(
                "{cmd_name} reported {} but no such file exists",
                produced.display()
            )));
        }
        Ok(produced)
    }
}

/// Fetches a streaming-platform URL through `extractor`.
///
/// Refused unless `config.allow_platform_sources` is set.
pub fn extract_platform_url<E: PlatformExtractor>(
    config: &CoreConfig,
    extractor: &E,
    raw: &str,
) -> CoreResult<AcquiredMedia> {
    if !config.allow_platform_sources {
        return Err(CoreError::PlatformSourcesDisabled);
    }
    let url = parse_media_url(raw)?;

    crate::progress_reporting::processing(&format!("Fetching {url} with the platform extractor"));
    let dir = create_temp_dir(config, "platform")?;
    let produced = extractor.extract(&url, dir.path())?;

    let display_name = produced
        .file_name()
        .map_or_else(|| "platform-media".to_string(), |n| n.to_string_lossy().to_string());
    log::info!("Platform extractor produced {}", produced.display());
    AcquiredMedia::from_temp_dir(dir, produced, display_name)
}
