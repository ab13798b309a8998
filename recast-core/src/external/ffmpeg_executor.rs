// ============================================================================
// recast-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. The traits allow tests to substitute a scripted process for the
// real binary; the default implementation is backed by ffmpeg-sidecar.

use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use crate::external::ffmpeg_builder::command_args;
use crate::progress_reporting::ffmpeg_handler::{FfmpegProgressHandler, LOG_TAIL_LINES};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            CoreError::ExternalTool(format!("ffmpeg output unavailable: {e}"))
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn().map(SidecarProcess).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CoreError::DependencyNotFound("ffmpeg".to_string())
            } else {
                command_start_error("ffmpeg", e)
            }
        })
    }
}

/// What a successful ffmpeg run reported about itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FfmpegRunLog {
    pub line_count: usize,
    /// Input duration parsed from ffmpeg's output
    pub duration_secs: Option<f64>,
}

/// Runs an ffmpeg command to completion, streaming its output to the
/// progress reporter.
///
/// A non-zero exit becomes [`CoreError::EncoderFailed`] carrying the tail of
/// the encoder log.
pub fn run_ffmpeg<S: FfmpegSpawner>(spawner: &S, mut cmd: FfmpegCommand) -> CoreResult<FfmpegRunLog> {
    log::debug!("Running ffmpeg: {}", command_args(&mut cmd).join(" "));

    let mut process = spawner.spawn(cmd)?;
    let mut handler = FfmpegProgressHandler::new();
    process.handle_events(|event| {
        handler.handle_event(event);
        Ok(())
    })?;
    let status = process.wait()?;
    crate::progress_reporting::clear_progress();

    if !status.success() {
        let log_tail = handler.log_tail(LOG_TAIL_LINES);
        log::error!("ffmpeg exited with {status}");
        return Err(CoreError::EncoderFailed { log_tail });
    }

    Ok(FfmpegRunLog {
        line_count: handler.log_lines().len(),
        duration_secs: handler.duration(),
    })
}
