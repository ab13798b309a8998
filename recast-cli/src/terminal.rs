//! Terminal UI for the CLI.
//!
//! [`CliReporter`] receives everything recast-core reports and renders it with
//! a small visual hierarchy: `===== SECTION =====` headers, `»` steps,
//! aligned key/value status lines and an indicatif bar while ffmpeg runs.
//! Text goes through `log` so it also lands in the log file when one is set.

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, error, info, warn};
use recast_core::progress_reporting::{OutputLevel, ProgressReporter};
use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

/// Width of the label column in status lines
const LABEL_WIDTH: usize = 16;

const STATUS_INDENT: &str = "  ";
const ENCODER_INDENT: &str = "    ";

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

/// Formats a status line with the label padded to a fixed column.
pub fn format_status(label: &str, value: &str) -> String {
    let padding = LABEL_WIDTH.saturating_sub(label.chars().count());
    format!("{STATUS_INDENT}{label}:{} {value}", " ".repeat(padding))
}

/// Formats a section header.
pub fn format_section(title: &str) -> String {
    format!("===== {} =====", title.to_uppercase())
}

/// Progress reporter that draws to stderr.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
    color: bool,
}

impl Default for CliReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            color: should_use_color(),
        }
    }

    /// Prints through `log`, hiding the progress bar while doing so.
    fn emit(&self, print: impl FnOnce()) {
        match self.bar.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(bar) => bar.suspend(print),
                None => print(),
            },
            Err(_) => print(),
        }
    }
}

impl ProgressReporter for CliReporter {
    fn output(&self, level: OutputLevel, text: &str) {
        let color = self.color;
        self.emit(|| match level {
            OutputLevel::Section => {
                info!("");
                if color {
                    info!("{}", style(format_section(text)).cyan().bold());
                } else {
                    info!("{}", format_section(text));
                }
            }
            OutputLevel::Processing => {
                if color {
                    info!("{STATUS_INDENT}» {}", style(text).bold());
                } else {
                    info!("{STATUS_INDENT}» {text}");
                }
            }
            OutputLevel::Success => {
                if color {
                    info!("{STATUS_INDENT}{} {}", style("✓").green().bold(), style(text).green());
                } else {
                    info!("{STATUS_INDENT}✓ {text}");
                }
            }
            OutputLevel::Error => {
                if color {
                    error!("{STATUS_INDENT}{} {}", style("✗").red().bold(), style(text).red());
                } else {
                    error!("{STATUS_INDENT}✗ {text}");
                }
            }
            OutputLevel::Warning => {
                if color {
                    warn!("{STATUS_INDENT}⚠ {}", style(text).yellow());
                } else {
                    warn!("{STATUS_INDENT}⚠ {text}");
                }
            }
            OutputLevel::Debug => debug!("{text}"),
            OutputLevel::Info => info!("{STATUS_INDENT}{text}"),
        });
    }

    fn output_status(&self, label: &str, value: &str, highlight: bool) {
        let line = if self.color && highlight {
            format_status(label, &style(value).bold().to_string())
        } else {
            format_status(label, value)
        };
        self.emit(|| info!("{line}"));
    }

    fn encoder_line(&self, line: &str) {
        let color = self.color;
        self.emit(|| {
            if color {
                info!("{ENCODER_INDENT}{}", style(line).dim());
            } else {
                info!("{ENCODER_INDENT}{line}");
            }
        });
    }

    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        let bar = guard.get_or_insert_with(init_progress_bar);
        bar.set_position(percent.clamp(0.0, 100.0).round() as u64);
        bar.set_message(format!(
            "{} / {}",
            recast_core::format_duration(elapsed_secs),
            recast_core::format_duration(total_secs)
        ));
    }

    fn clear_progress_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

/// Initialize a progress bar with indicatif, sized to the terminal
fn init_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);

    let term_width = Term::stderr().size().1 as usize;
    let template = if term_width >= 80 {
        "  ⧖ Encoding: {pos:>3}% [{bar:30}] {msg}"
    } else {
        "  ⧖ {pos:>3}% [{bar:15}]"
    };
    let bar_style = ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.");
    pb.set_style(bar_style);

    if !std::io::stderr().is_terminal() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb.enable_steady_tick(Duration::from_millis(200));
    pb
}
