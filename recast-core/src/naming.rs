//! Output file naming.
//!
//! Generated names encode the chosen options so that several conversions of
//! the same source can sit side by side, e.g.
//! `My_Clip_720p_crf23_160k.mp4` or `My_Clip_192k.mp3`.

use std::sync::LazyLock;

use regex::Regex;

use crate::options::{Mp3Options, Mp4Options};

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-\. ]+").expect("valid regex"));

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Name used when sanitizing leaves nothing.
pub const FALLBACK_NAME: &str = "output";

/// Makes `name` safe to offer as a download file name.
///
/// Runs of characters other than letters, digits, `_`, `-`, `.` and space
/// become `_`, whitespace runs become `_`, and leading/trailing underscores
/// are trimmed.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let replaced = DISALLOWED_CHARS.replace_all(name, "_");
    let collapsed = WHITESPACE_RUN.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Drops the final extension of `name`. Leading dots do not start an extension.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => &name[..idx],
        _ => name,
    }
}

/// Sanitized base name (no extension) derived from a display name.
#[must_use]
pub fn output_base_name(display_name: &str) -> String {
    sanitize_filename(strip_extension(display_name))
}

/// `{base}_{res}_crf{crf}_{k}k.mp4`
#[must_use]
pub fn mp4_output_name(display_name: &str, opts: &Mp4Options) -> String {
    format!(
        "{}_{}_crf{}_{}k.mp4",
        output_base_name(display_name),
        opts.resolution.file_label(),
        opts.crf,
        opts.audio_bitrate_kbps
    )
}

/// `{base}_{k}k.mp3`
#[must_use]
pub fn mp3_output_name(display_name: &str, opts: &Mp3Options) -> String {
    format!("{}_{}k.mp3", output_base_name(display_name), opts.bitrate_kbps)
}
