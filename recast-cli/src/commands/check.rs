//! Implementation of the `check` subcommand.

use crate::cli::GlobalArgs;
use crate::config::core_config;
use crate::error::CliResult;

use recast_core::progress_reporting::{info, section, status, success, warning};
use recast_core::{check_dependency, locate_ffmpeg};

/// Reports whether ffmpeg and yt-dlp can be run.
///
/// A missing ffmpeg is an error since no conversion can run without it.
/// yt-dlp only matters when platform sources are enabled.
pub fn run_check(global: &GlobalArgs) -> CliResult<()> {
    let config = core_config(global);
    section("Dependencies");

    let ffmpeg = locate_ffmpeg(&config);
    match &ffmpeg {
        Ok(path) => status("ffmpeg", &path.display().to_string(), true),
        Err(e) => status("ffmpeg", &format!("missing ({e})"), true),
    }

    let ytdlp = check_dependency(&config.ytdlp_path, "--version");
    match &ytdlp {
        Ok(()) => status("yt-dlp", &config.ytdlp_path.display().to_string(), false),
        Err(_) => status("yt-dlp", "missing", false),
    }
    status(
        "Platform sources",
        if config.allow_platform_sources { "enabled" } else { "disabled" },
        false,
    );

    if config.allow_platform_sources && ytdlp.is_err() {
        warning("Platform sources are enabled but yt-dlp cannot be run");
    } else if !config.allow_platform_sources {
        info("Streaming-platform pages need --allow-platform-sources (RECAST_ALLOW_PLATFORM_SOURCES)");
    }

    ffmpeg?;
    success("Ready to convert");
    Ok(())
}
