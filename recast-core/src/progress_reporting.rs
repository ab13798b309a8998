//! Progress Reporting API
//!
//! This module provides a minimal API for the core library to report progress
//! and output messages without depending on how a front end displays them.
//! The CLI installs a terminal reporter, the browser server installs the
//! log-backed [`LogReporter`]. With no reporter installed every call is a no-op.

pub mod ffmpeg_handler;

use std::sync::Mutex;
use std::time::Duration;

/// Represents different levels of output for structured reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Major workflow phases
    Section,
    /// Processing steps
    Processing,
    /// Success messages
    Success,
    /// Error messages
    Error,
    /// Warning messages
    Warning,
    /// Debug information
    Debug,
    /// General information
    Info,
}

/// Receiver for everything the core wants a user to see.
pub trait ProgressReporter: Send + Sync {
    /// Output a message at a specific level
    fn output(&self, level: OutputLevel, text: &str);

    /// Output a key-value status pair
    fn output_status(&self, label: &str, value: &str, highlight: bool);

    /// Show a line of encoder output
    fn encoder_line(&self, line: &str);

    /// Report progress with a progress bar
    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64);

    /// Clear any active progress bar
    fn clear_progress_bar(&self);
}

/// Global progress reporter instance
static PROGRESS_REPORTER: std::sync::LazyLock<Mutex<Option<Box<dyn ProgressReporter>>>> =
    std::sync::LazyLock::new(|| Mutex::new(None));

/// Set the global progress reporter
pub fn set_progress_reporter(reporter: Box<dyn ProgressReporter>) {
    if let Ok(mut r) = PROGRESS_REPORTER.lock() {
        *r = Some(reporter);
    }
}

/// Remove the global progress reporter
pub fn clear_progress_reporter() {
    if let Ok(mut r) = PROGRESS_REPORTER.lock() {
        *r = None;
    }
}

/// Execute a function with the progress reporter if available
#[inline]
pub fn with_reporter<F>(f: F)
where
    F: FnOnce(&dyn ProgressReporter),
{
    if let Ok(guard) = PROGRESS_REPORTER.lock() {
        if let Some(reporter) = guard.as_ref() {
            f(reporter.as_ref());
        }
    }
}

/// Output a section header
pub fn section(title: &str) {
    with_reporter(|r| r.output(OutputLevel::Section, title));
}

/// Output a processing step
pub fn processing(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Processing, message));
}

/// Output a status line
pub fn status(label: &str, value: &str, highlight: bool) {
    with_reporter(|r| r.output_status(label, value, highlight));
}

/// Output a success message
pub fn success(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Success, message));
}

/// Output an error message
pub fn error(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Error, message));
}

/// Output a warning message
pub fn warning(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Warning, message));
}

/// Output debug information
pub fn debug(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Debug, message));
}

/// Output general information
pub fn info(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Info, message));
}

/// Show a line of encoder output
pub fn encoder_line(line: &str) {
    with_reporter(|r| r.encoder_line(line));
}

/// Report progress
pub fn progress(percent: f32, elapsed_secs: f64, total_secs: f64) {
    with_reporter(|r| r.progress_bar(percent, elapsed_secs, total_secs));
}

/// Clear progress bar
pub fn clear_progress() {
    with_reporter(|r| r.clear_progress_bar());
}

/// Report a finished conversion
pub fn conversion_summary(
    file_name: &str,
    elapsed: Duration,
    source_duration: Option<f64>,
    input_size: u64,
    output_size: u64,
) {
    success("Conversion complete");
    status("File", file_name, true);
    if let Some(secs) = source_duration {
        status("Duration", &crate::utils::format_duration(secs), false);
    }
    status("Time", &crate::utils::format_duration(elapsed.as_secs_f64()), false);
    status("Input size", &crate::format_bytes(input_size), false);
    status("Output size", &crate::format_bytes(output_size), false);
}

/// Reporter that forwards everything to the `log` facade.
///
/// Used where there is no terminal to draw on, e.g. the browser UI server.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn output(&self, level: OutputLevel, text: &str) {
        match level {
            OutputLevel::Error => log::error!("{text}"),
            OutputLevel::Warning => log::warn!("{text}"),
            OutputLevel::Debug => log::debug!("{text}"),
            OutputLevel::Section
            | OutputLevel::Processing
            | OutputLevel::Success
            | OutputLevel::Info => log::info!("{text}"),
        }
    }

    fn output_status(&self, label: &str, value: &str, _highlight: bool) {
        log::info!("{label}: {value}");
    }

    fn encoder_line(&self, line: &str) {
        log::info!(target: "recast::progress", "ffmpeg: {line}");
    }

    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64) {
        log::info!(
            target: "recast::progress",
            "Encoding progress: {:.1}% ({} / {})",
            percent,
            crate::utils::format_duration(elapsed_secs),
            crate::utils::format_duration(total_secs)
        );
    }

    fn clear_progress_bar(&self) {}
}
