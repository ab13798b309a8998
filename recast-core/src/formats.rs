//! Known media container extensions.
//!
//! Sources keep their extension on disk when it is one we recognise so that
//! ffmpeg can use it as a demuxer hint; anything else is stored as `.bin` and
//! left to ffmpeg's content probing.

use std::path::Path;

/// Video containers accepted as sources.
pub const VALID_VIDEO_EXTS: &[&str] = &["mp4", "mov", "mkv", "webm", "avi"];

/// Audio containers accepted as sources.
pub const VALID_AUDIO_EXTS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac"];

/// Suffix used for sources with an unknown or missing extension.
pub const FALLBACK_SUFFIX: &str = ".bin";

/// Returns true if `ext` (without the dot, any case) is a known media extension.
#[must_use]
pub fn is_valid_extension(ext: &str) -> bool {
    let lower = ext.to_ascii_lowercase();
    VALID_VIDEO_EXTS.contains(&lower.as_str()) || VALID_AUDIO_EXTS.contains(&lower.as_str())
}

/// Returns the temp file suffix (with leading dot) for a source named `name`.
///
/// `clip.MOV` gives `.mov`, `notes.txt` and `README` give `.bin`.
#[must_use]
pub fn temp_suffix_for(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| is_valid_extension(ext))
        .map_or_else(
            || FALLBACK_SUFFIX.to_string(),
            |ext| format!(".{}", ext.to_ascii_lowercase()),
        )
}

/// All accepted extensions, sorted, without dots. Used for file pickers.
#[must_use]
pub fn accepted_extensions() -> Vec<&'static str> {
    let mut exts: Vec<&'static str> = VALID_VIDEO_EXTS
        .iter()
        .chain(VALID_AUDIO_EXTS.iter())
        .copied()
        .collect();
    exts.sort_unstable();
    exts
}
