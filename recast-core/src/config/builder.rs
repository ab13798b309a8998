//! Builder pattern for [`CoreConfig`].

use std::path::PathBuf;
use std::time::Duration;

use super::CoreConfig;

/// Builder for creating `CoreConfig` instances.
///
/// Starts from `CoreConfig::default()`; every setter overrides one field.
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new builder with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory used for temporary files
    #[must_use]
    pub fn temp_dir(mut self, temp_dir: PathBuf) -> Self {
        self.config.temp_dir = Some(temp_dir);
        self
    }

    /// Sets an explicit ffmpeg binary
    #[must_use]
    pub fn ffmpeg_path(mut self, path: PathBuf) -> Self {
        self.config.ffmpeg_path = Some(path);
        self
    }

    /// Enables downloading ffmpeg when it cannot be found
    #[must_use]
    pub fn auto_download_ffmpeg(mut self, enabled: bool) -> Self {
        self.config.auto_download_ffmpeg = enabled;
        self
    }

    /// Sets the yt-dlp binary
    #[must_use]
    pub fn ytdlp_path(mut self, path: PathBuf) -> Self {
        self.config.ytdlp_path = path;
        self
    }

    /// Allows or forbids streaming-platform sources
    #[must_use]
    pub fn allow_platform_sources(mut self, allowed: bool) -> Self {
        self.config.allow_platform_sources = allowed;
        self
    }

    /// Sets the download timeout in seconds
    #[must_use]
    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout = Duration::from_secs(secs);
        self
    }

    /// Sets the upload limit in bytes
    #[must_use]
    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Builds the `CoreConfig`
    #[must_use]
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
