//! Configuration structures and constants for the recast-core library.
//!
//! This module holds the settings that stay fixed across conversions:
//! where external tools live, where temporary files go, network timeouts and
//! whether streaming-platform sources may be used at all. Per-conversion
//! choices (resolution, CRF, bitrate...) live in [`crate::options`].

mod builder;

use std::path::PathBuf;
use std::time::Duration;

pub use builder::CoreConfigBuilder;

// Default constants

/// Timeout applied to direct URL downloads.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Upload size accepted by the browser UI (200 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Binary name used for the platform extractor when no path is configured.
pub const DEFAULT_YTDLP_BINARY: &str = "yt-dlp";

/// Main configuration structure for the recast-core library.
///
/// All fields have sensible defaults. The builder pattern provides a
/// convenient way to create and configure instances.
///
/// # Examples
///
/// ```rust
/// use recast_core::config::CoreConfigBuilder;
///
/// let config = CoreConfigBuilder::new()
///     .http_timeout_secs(60)
///     .allow_platform_sources(true)
///     .build();
/// assert!(config.allow_platform_sources);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory for temporary source and output files (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,

    /// Explicit ffmpeg binary. When unset, ffmpeg-sidecar's lookup is used.
    pub ffmpeg_path: Option<PathBuf>,

    /// Download a static ffmpeg build when none can be found
    pub auto_download_ffmpeg: bool,

    /// Platform extractor binary (yt-dlp)
    pub ytdlp_path: PathBuf,

    /// Whether streaming-platform URLs may be resolved with the extractor
    pub allow_platform_sources: bool,

    /// Timeout for direct URL downloads
    pub http_timeout: Duration,

    /// Largest upload the browser UI accepts, in bytes
    pub max_upload_bytes: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            ffmpeg_path: None,
            auto_download_ffmpeg: false,
            ytdlp_path: PathBuf::from(DEFAULT_YTDLP_BINARY),
            allow_platform_sources: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl CoreConfig {
    /// Base directory for temporary files.
    #[must_use]
    pub fn temp_base_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
