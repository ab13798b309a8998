//! Uploaded files.

use std::io::Write;

use crate::acquisition::AcquiredMedia;
use crate::config::CoreConfig;
use crate::error::CoreResult;
use crate::formats::temp_suffix_for;
use crate::temp_files::create_temp_file;

/// Writes uploaded bytes to a temp file named after the upload's extension.
///
/// The display name stays the client's original file name.
pub fn save_upload(config: &CoreConfig, file_name: &str, bytes: &[u8]) -> CoreResult<AcquiredMedia> {
    let suffix = temp_suffix_for(file_name);
    let mut temp = create_temp_file(config, "upload", &suffix)?;
    temp.write_all(bytes)?;
    temp.flush()?;

    log::debug!(
        "Saved upload '{}' ({} bytes) to {}",
        file_name,
        bytes.len(),
        temp.path().display()
    );
    AcquiredMedia::from_temp_file(temp.into_temp_path(), file_name.to_string())
}
