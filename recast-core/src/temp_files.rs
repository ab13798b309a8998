//! Temporary file management utilities.
//!
//! Sources and outputs live in temporary files created through the tempfile
//! crate, so they are removed when their handle is dropped, including on
//! error paths. Callers that want to keep a result move it out with
//! [`crate::ConversionOutput::persist_to`].

use crate::config::CoreConfig;
use crate::error::CoreResult;
use tempfile::{Builder as TempFileBuilder, NamedTempFile, TempDir};

/// Prefix shared by everything this crate puts in the temp directory.
pub const TEMP_PREFIX: &str = "recast";

/// Creates a temporary directory with prefix. Auto-cleaned when dropped.
pub fn create_temp_dir(config: &CoreConfig, prefix: &str) -> CoreResult<TempDir> {
    let temp_base_dir = config.temp_base_dir();
    std::fs::create_dir_all(&temp_base_dir)?;

    Ok(TempFileBuilder::new()
        .prefix(&format!("{TEMP_PREFIX}_{prefix}_"))
        .tempdir_in(temp_base_dir)?)
}

/// Creates an empty temporary file ending in `suffix` (e.g. `.mp4`).
/// Auto-deleted when dropped.
pub fn create_temp_file(config: &CoreConfig, prefix: &str, suffix: &str) -> CoreResult<NamedTempFile> {
    let temp_base_dir = config.temp_base_dir();
    std::fs::create_dir_all(&temp_base_dir)?;

    let temp_file = TempFileBuilder::new()
        .prefix(&format!("{TEMP_PREFIX}_{prefix}_"))
        .suffix(suffix)
        .tempfile_in(temp_base_dir)?;

    Ok(temp_file)
}
