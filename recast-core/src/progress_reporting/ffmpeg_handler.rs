//! `FFmpeg` output handler
//!
//! Collects every line ffmpeg writes, forwards a sample of them to the
//! progress reporter and turns progress events into a percentage once the
//! input duration is known.

use crate::parse_ffmpeg_time;
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};

/// Every Nth encoder line is shown to the user.
pub const ENCODER_LINE_INTERVAL: usize = 25;

/// Number of trailing log lines attached to encoder failures.
pub const LOG_TAIL_LINES: usize = 15;

/// Handler for `FFmpeg` events
pub struct FfmpegProgressHandler {
    duration: Option<f64>,
    log_lines: Vec<String>,
    line_interval: usize,
    last_progress_percent: f64,
}

impl Default for FfmpegProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegProgressHandler {
    /// Creates a handler reporting every [`ENCODER_LINE_INTERVAL`]th line
    #[must_use]
    pub fn new() -> Self {
        Self::with_line_interval(ENCODER_LINE_INTERVAL)
    }

    #[must_use]
    pub fn with_line_interval(line_interval: usize) -> Self {
        Self {
            duration: None,
            log_lines: Vec::new(),
            line_interval: line_interval.max(1),
            last_progress_percent: -1.0,
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) {
        match event {
            FfmpegEvent::ParsedDuration(parsed) => {
                if self.duration.is_none() && parsed.duration > 0.0 {
                    self.duration = Some(parsed.duration);
                }
            }
            FfmpegEvent::Progress(progress) => self.handle_progress(progress),
            FfmpegEvent::Log(level, message) => self.handle_log(&level, message),
            FfmpegEvent::Error(error) => {
                log::debug!(target: "ffmpeg_log", "{error}");
                self.push_line(error);
            }
            _ => {}
        }
    }

    /// All lines seen so far
    #[must_use]
    pub fn log_lines(&self) -> &[String] {
        &self.log_lines
    }

    /// Input duration in seconds, once ffmpeg has printed it
    #[must_use]
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Last `count` lines joined with newlines
    #[must_use]
    pub fn log_tail(&self, count: usize) -> String {
        let start = self.log_lines.len().saturating_sub(count);
        self.log_lines[start..].join("\n")
    }

    fn push_line(&mut self, line: String) {
        let line = line.trim_end().to_string();
        self.log_lines.push(line);
        if self.log_lines.len() % self.line_interval == 0 {
            if let Some(last) = self.log_lines.last() {
                crate::progress_reporting::encoder_line(last);
            }
        }
    }

    fn handle_progress(&mut self, progress: FfmpegProgress) {
        let current_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);
        self.push_line(progress.raw_log_message);

        let Some(percent) = percent_complete(current_secs, self.duration) else {
            return;
        };
        if percent >= self.last_progress_percent + 1.0
            || (percent >= 100.0 && self.last_progress_percent < 100.0)
        {
            crate::progress_reporting::progress(
                percent as f32,
                current_secs,
                self.duration.unwrap_or(0.0),
            );
            self.last_progress_percent = percent;
        }
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: String) {
        let log_level = map_ffmpeg_log_level(level);
        if log_level == log::Level::Info {
            log::debug!(target: "ffmpeg_log", "{message}");
        } else {
            log::log!(target: "ffmpeg_log", log_level, "{message}");
        }
        self.push_line(message);
    }
}

/// Percentage of `duration` covered by `current_secs`, capped at 100.
#[must_use]
pub fn percent_complete(current_secs: f64, duration: Option<f64>) -> Option<f64> {
    duration
        .filter(|&d| d > 0.0)
        .map(|d| (current_secs / d * 100.0).clamp(0.0, 100.0))
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}
