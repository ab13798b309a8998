// ============================================================================
// recast-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern dispatch for console and optional log file
//
// Terminal output from the progress reporter goes through `log` as well, so
// the console sink prints bare messages while the file sink gets timestamps
// and levels. ffmpeg's own log lines (target `ffmpeg_log`) only appear with
// --verbose.

use log::LevelFilter;
use std::path::Path;

use crate::error::{CliErrorContext, CliResult};

/// Target used by the core for raw encoder output.
pub const FFMPEG_LOG_TARGET: &str = "ffmpeg_log";

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Console level for the given verbosity.
pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
///
/// Fails if a logger is already installed or the log file cannot be opened.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let level = console_level(verbose);

    let console = fern::Dispatch::new()
        .level(level)
        .level_for(
            FFMPEG_LOG_TARGET,
            if verbose { LevelFilter::Debug } else { LevelFilter::Warn },
        )
        .level_for("hyper", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .format(move |out, message, record| {
            if verbose && record.level() >= log::Level::Debug {
                out.finish(format_args!(
                    "{} {:<5} [{}] {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    record.level(),
                    record.target(),
                    message
                ));
            } else {
                out.finish(format_args!("{message}"));
            }
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new().chain(console);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = fern::log_file(path)
            .cli_with_context(|| format!("Failed to open log file {}", path.display()))?;
        let file_sink = fern::Dispatch::new()
            .level(LevelFilter::Debug)
            .level_for("hyper", LevelFilter::Info)
            .level_for("reqwest", LevelFilter::Info)
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} {:<5} [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    strip_styling(&message.to_string())
                ));
            })
            .chain(file);
        root = root.chain(file_sink);
    }

    root.apply()
        .map_err(|e| recast_core::CoreError::OperationFailed(format!("Failed to set up logging: {e}")))?;
    log::debug!("Logger initialized with console level {}", level);
    Ok(())
}

/// Removes ANSI styling so the log file stays plain text.
fn strip_styling(text: &str) -> String {
    console::strip_ansi_codes(text).into_owned()
}
