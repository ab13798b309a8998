// ============================================================================
// recast-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates interactions with the external encoding engine
// (ffmpeg): locating the binary, building its command lines and running it.
// Process spawning sits behind traits so tests can substitute scripted
// processes for the real binary.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};

use std::ffi::OsStr;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Builds ffmpeg argument lists for MP4 and MP3 output
pub mod ffmpeg_builder;

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

pub use ffmpeg_builder::{FfmpegCommandBuilder, FilterChain, build_mp3_command, build_mp4_command};
pub use ffmpeg_executor::{
    FfmpegProcess, FfmpegRunLog, FfmpegSpawner, SidecarProcess, SidecarSpawner, run_ffmpeg,
};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs the command with `version_arg` and discards its output. Only a
/// failure to start counts; the exit status is ignored.
pub fn check_dependency<S: AsRef<OsStr>>(cmd: S, version_arg: &str) -> CoreResult<()> {
    let cmd_name = cmd.as_ref().to_string_lossy().to_string();

    let result = Command::new(cmd.as_ref())
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name, e))
        }
    }
}

/// The ffmpeg binary conversions will invoke.
///
/// The configured path wins; otherwise ffmpeg-sidecar's lookup (a binary
/// next to the executable, or `ffmpeg` on PATH).
#[must_use]
pub fn ffmpeg_binary(config: &CoreConfig) -> PathBuf {
    config
        .ffmpeg_path
        .clone()
        .unwrap_or_else(ffmpeg_sidecar::paths::ffmpeg_path)
}

/// Finds a working ffmpeg, downloading one if the config allows it.
pub fn locate_ffmpeg(config: &CoreConfig) -> CoreResult<PathBuf> {
    let candidate = ffmpeg_binary(config);
    match check_dependency(&candidate, "-version") {
        Ok(()) => return Ok(candidate),
        Err(e) if config.ffmpeg_path.is_some() || !config.auto_download_ffmpeg => return Err(e),
        Err(_) => {}
    }

    crate::progress_reporting::processing("ffmpeg not found, downloading a static build");
    ffmpeg_sidecar::download::auto_download()
        .map_err(|e| CoreError::ExternalTool(format!("ffmpeg download failed: {e}")))?;

    let downloaded = ffmpeg_sidecar::paths::ffmpeg_path();
    check_dependency(&downloaded, "-version")?;
    crate::progress_reporting::success(&format!("ffmpeg installed at {}", downloaded.display()));
    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfigBuilder;

    #[test]
    fn test_missing_dependency_reported() {
        let result = check_dependency("recast-surely-missing-binary", "--version");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(name)) if name == "recast-surely-missing-binary"));
    }

    #[test]
    fn test_configured_ffmpeg_path_wins() {
        let config = CoreConfigBuilder::new()
            .ffmpeg_path(PathBuf::from("/opt/custom/ffmpeg"))
            .build();
        assert_eq!(ffmpeg_binary(&config), PathBuf::from("/opt/custom/ffmpeg"));
    }

    #[test]
    fn test_locate_does_not_download_for_explicit_path() {
        let config = CoreConfigBuilder::new()
            .ffmpeg_path(PathBuf::from("/nonexistent/recast/ffmpeg"))
            .auto_download_ffmpeg(true)
            .build();
        assert!(matches!(
            locate_ffmpeg(&config),
            Err(CoreError::DependencyNotFound(_))
        ));
    }
}
