// recast-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and when the "test-mocks" feature is enabled.

use crate::acquisition::PlatformExtractor;
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_builder::command_args;
use crate::external::{FfmpegProcess, FfmpegSpawner};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};
use url::Url;

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Mock implementation of FfmpegSpawner.
///
/// Records the arguments of every spawned command, writes `output_bytes` to
/// the command's output path (its last argument) and then replays the
/// configured log lines with the configured exit code.
#[derive(Clone)]
pub struct MockFfmpegSpawner {
    log_lines: Vec<String>,
    exit_code: i32,
    output_bytes: Option<Vec<u8>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Default for MockFfmpegSpawner {
    fn default() -> Self {
        Self::succeeding(b"mock media".to_vec())
    }
}

impl MockFfmpegSpawner {
    /// A spawner whose runs succeed and produce `output` as the output file.
    pub fn succeeding(output: Vec<u8>) -> Self {
        Self {
            log_lines: vec!["Press [q] to stop, [?] for help".to_string()],
            exit_code: 0,
            output_bytes: Some(output),
            received_calls: Arc::default(),
        }
    }

    /// A spawner whose runs fail with `exit_code` after printing `log_lines`.
    pub fn failing(exit_code: i32, log_lines: &[&str]) -> Self {
        Self {
            log_lines: log_lines.iter().map(|l| (*l).to_string()).collect(),
            exit_code,
            output_bytes: None,
            received_calls: Arc::default(),
        }
    }

    /// Replaces the log lines replayed on each run.
    pub fn with_log_lines(mut self, log_lines: &[&str]) -> Self {
        self.log_lines = log_lines.iter().map(|l| (*l).to_string()).collect();
        self
    }

    /// Arguments of every command spawned so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.received_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args = command_args(&mut cmd);
        log::debug!("MockFfmpegSpawner received: {}", args.join(" "));

        if let (Some(bytes), Some(output)) = (&self.output_bytes, args.last()) {
            std::fs::write(output, bytes)?;
        }
        if let Ok(mut calls) = self.received_calls.lock() {
            calls.push(args);
        }

        Ok(MockFfmpegProcess {
            events_to_emit: self
                .log_lines
                .iter()
                .map(|line| FfmpegEvent::Log(LogLevel::Info, line.clone()))
                .collect(),
            exit_status: ExitStatus::from_raw(self.exit_code << 8),
        })
    }
}

/// Mock implementation of PlatformExtractor.
///
/// Writes a file named `file_name` into the destination directory, or fails
/// with an external tool error when constructed with [`MockPlatformExtractor::failing`].
#[derive(Clone, Default)]
pub struct MockPlatformExtractor {
    file_name: String,
    contents: Vec<u8>,
    fail: bool,
    received_urls: Arc<Mutex<Vec<String>>>,
}

impl MockPlatformExtractor {
    pub fn new(file_name: &str, contents: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            contents: contents.to_vec(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// URLs passed to `extract` so far.
    pub fn urls(&self) -> Vec<String> {
        self.received_urls
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl PlatformExtractor for MockPlatformExtractor {
    fn extract(&self, url: &Url, dest_dir: &Path) -> CoreResult<PathBuf> {
        if let Ok(mut urls) = self.received_urls.lock() {
            urls.push(url.to_string());
        }
        if self.fail {
            return Err(CoreError::ExternalTool(
                "yt-dlp: ERROR: Unsupported URL".to_string(),
            ));
        }
        let path = dest_dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        Ok(path)
    }
}
