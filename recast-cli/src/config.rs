// recast-cli/src/config.rs
//
// Turns the global command-line options into a `CoreConfig`.

use crate::cli::GlobalArgs;
use recast_core::config::{CoreConfig, CoreConfigBuilder, DEFAULT_HTTP_TIMEOUT_SECS};

/// Builds the core configuration shared by every subcommand.
pub fn core_config(global: &GlobalArgs) -> CoreConfig {
    let mut builder = CoreConfigBuilder::new()
        .auto_download_ffmpeg(global.download_ffmpeg)
        .allow_platform_sources(global.allow_platform_sources)
        .http_timeout_secs(global.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS));

    if let Some(dir) = &global.temp_dir {
        builder = builder.temp_dir(dir.clone());
    }
    if let Some(path) = &global.ffmpeg_path {
        builder = builder.ffmpeg_path(path.clone());
    }
    if let Some(path) = &global.ytdlp_path {
        builder = builder.ytdlp_path(path.clone());
    }
    builder.build()
}
