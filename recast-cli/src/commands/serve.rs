//! Implementation of the `serve` subcommand.
//!
//! Runs the browser UI on a multi-threaded tokio runtime. Conversions still
//! use the blocking core API, on the runtime's blocking pool.

use crate::cli::{GlobalArgs, ServeArgs};
use crate::config::core_config;
use crate::error::{CliErrorContext, CliResult};
use crate::web::{AppState, serve};

use recast_core::progress_reporting::{LogReporter, set_progress_reporter};
use recast_core::{SidecarSpawner, YtDlpExtractor, locate_ffmpeg};

use log::{info, warn};

pub fn run_serve(global: &GlobalArgs, args: &ServeArgs) -> CliResult<()> {
    let mut config = core_config(global);
    if let Some(mib) = args.max_upload_mb {
        config.max_upload_bytes = mib.saturating_mul(1024 * 1024);
    }

    // No terminal bar while serving concurrent requests
    set_progress_reporter(Box::new(LogReporter));

    match locate_ffmpeg(&config) {
        Ok(path) => {
            info!("Using ffmpeg at {}", path.display());
            config.ffmpeg_path = Some(path);
        }
        Err(e) => warn!("{e}; conversions will fail until ffmpeg is installed"),
    }
    if config.allow_platform_sources {
        warn!("Platform sources are enabled; users are responsible for rights to the content");
    }

    let extractor = YtDlpExtractor::from_config(&config);
    let state = AppState::new(config, SidecarSpawner, extractor);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .cli_context("Failed to start the async runtime")?;
    runtime.block_on(serve(args.bind, state))
}
