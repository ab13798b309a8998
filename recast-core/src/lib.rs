//! Core library for converting media files with ffmpeg.
//!
//! This crate gets a source file onto disk (upload, direct URL or a
//! streaming-platform URL via yt-dlp), builds the ffmpeg command for the
//! requested output (H.264/AAC MP4 or MP3) and runs it, reporting the
//! encoder's output through the [`progress_reporting`] API.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use recast_core::{CoreConfig, InputSource, Mp4Options, SidecarSpawner, YtDlpExtractor};
//! use std::path::Path;
//!
//! let config = CoreConfig::default();
//! let media = recast_core::acquire(
//!     &config,
//!     &YtDlpExtractor::from_config(&config),
//!     InputSource::Local("holiday.mov".into()),
//! ).unwrap();
//!
//! let output = recast_core::transcode_to_mp4(
//!     &SidecarSpawner,
//!     &config,
//!     &media,
//!     &Mp4Options::default(),
//! ).unwrap();
//! let saved = output.persist_to(Path::new("converted")).unwrap();
//! println!("Wrote {}", saved.display());
//! ```

pub mod acquisition;
pub mod config;
pub mod conversion;
pub mod error;
pub mod external;
pub mod formats;
pub mod naming;
pub mod options;
pub mod progress_reporting;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use acquisition::{
    AcquiredMedia, InputSource, PlatformExtractor, YtDlpExtractor, acquire, open_local,
};
pub use config::{CoreConfig, CoreConfigBuilder};
pub use conversion::{ConversionOutput, convert, extract_to_mp3, transcode_to_mp4};
pub use error::{CoreError, CoreResult};
pub use external::{SidecarSpawner, check_dependency, locate_ffmpeg};
pub use naming::sanitize_filename;
pub use options::{ConversionTarget, Mp3Options, Mp4Options, Preset, Resolution};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};

