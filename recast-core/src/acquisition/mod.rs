//! Getting a source file onto local disk.
//!
//! A conversion always starts from a file path. This module turns each kind
//! of user input into one: uploaded bytes are written to a temp file, direct
//! URLs are downloaded, streaming-platform URLs are handed to the platform
//! extractor, and local paths are used in place.
//!
//! The resulting [`AcquiredMedia`] owns whatever temporary storage was
//! created, so dropping it removes the source copy.

mod http;
mod platform;
mod upload;

use std::path::{Path, PathBuf};

use tempfile::{TempDir, TempPath};

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};

pub use http::{download_direct_url, display_name_from_url, is_streaming_platform, parse_media_url};
pub use platform::{PlatformExtractor, YtDlpExtractor, extract_platform_url};
pub use upload::save_upload;

/// Where the user's media comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Bytes received from an upload together with the client's file name
    Upload { file_name: String, bytes: Vec<u8> },
    /// A file already on this machine
    Local(PathBuf),
    /// A URL pointing directly at a media file
    DirectUrl(String),
    /// A streaming-platform page resolved by the platform extractor
    PlatformUrl(String),
}

/// Temporary storage kept alive for as long as the media is in use.
#[derive(Debug)]
enum TempGuard {
    None,
    File(TempPath),
    Dir(TempDir),
}

/// A source file ready to be handed to the encoder.
#[derive(Debug)]
pub struct AcquiredMedia {
    path: PathBuf,
    display_name: String,
    size: u64,
    guard: TempGuard,
}

impl AcquiredMedia {
    fn from_temp_file(temp: TempPath, display_name: String) -> CoreResult<Self> {
        let path = temp.to_path_buf();
        let size = std::fs::metadata(&path)?.len();
        Ok(Self {
            path,
            display_name,
            size,
            guard: TempGuard::File(temp),
        })
    }

    fn from_temp_dir(dir: TempDir, path: PathBuf, display_name: String) -> CoreResult<Self> {
        let size = std::fs::metadata(&path)?.len();
        Ok(Self {
            path,
            display_name,
            size,
            guard: TempGuard::Dir(dir),
        })
    }

    /// Path of the source file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name shown to the user and used to derive the output name
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Size of the source file in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// True when the file is a temporary copy that is removed on drop
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        !matches!(self.guard, TempGuard::None)
    }
}

/// Uses a file already on disk as the source. The file is never deleted.
pub fn open_local(path: &Path) -> CoreResult<AcquiredMedia> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CoreError::InputNotFound(format!("{}: {e}", path.display())))?;
    if !metadata.is_file() {
        return Err(CoreError::InputNotFound(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let display_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());

    Ok(AcquiredMedia {
        path: path.to_path_buf(),
        display_name,
        size: metadata.len(),
        guard: TempGuard::None,
    })
}

/// Resolves any [`InputSource`] to a file on disk.
pub fn acquire<E: PlatformExtractor>(
    config: &CoreConfig,
    extractor: &E,
    source: InputSource,
) -> CoreResult<AcquiredMedia> {
    let media = match source {
        InputSource::Upload { file_name, bytes } => save_upload(config, &file_name, &bytes)?,
        InputSource::Local(path) => open_local(&path)?,
        InputSource::DirectUrl(url) => download_direct_url(config, &url)?,
        InputSource::PlatformUrl(url) => extract_platform_url(config, extractor, &url)?,
    };

    crate::progress_reporting::success("File ready");
    crate::progress_reporting::status("Source", media.display_name(), false);
    crate::progress_reporting::status("Size", &crate::format_bytes(media.size()), false);
    Ok(media)
}
