// recast-core/tests/progress_tests.rs
//
// Checks what a conversion reports through the global progress reporter.
// Kept in its own test binary because the reporter is process-wide.

use recast_core::external::mocks::MockFfmpegSpawner;
use recast_core::progress_reporting::{
    OutputLevel, ProgressReporter, clear_progress_reporter, set_progress_reporter,
};
use recast_core::{CoreConfigBuilder, Mp3Options, extract_to_mp3, open_local};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Recorded {
    messages: Vec<(OutputLevel, String)>,
    statuses: Vec<(String, String)>,
    encoder_lines: Vec<String>,
    cleared: usize,
}

#[derive(Clone, Default)]
struct RecordingReporter(Arc<Mutex<Recorded>>);

impl ProgressReporter for RecordingReporter {
    fn output(&self, level: OutputLevel, text: &str) {
        self.0.lock().unwrap().messages.push((level, text.to_string()));
    }

    fn output_status(&self, label: &str, value: &str, _highlight: bool) {
        self.0
            .lock()
            .unwrap()
            .statuses
            .push((label.to_string(), value.to_string()));
    }

    fn encoder_line(&self, line: &str) {
        self.0.lock().unwrap().encoder_lines.push(line.to_string());
    }

    fn progress_bar(&self, _percent: f32, _elapsed_secs: f64, _total_secs: f64) {}

    fn clear_progress_bar(&self) {
        self.0.lock().unwrap().cleared += 1;
    }
}

#[test]
fn test_conversion_reports_sampled_encoder_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("podcast.wav");
    std::fs::write(&source, b"RIFF").unwrap();
    let config = CoreConfigBuilder::new()
        .temp_dir(dir.path().join("tmp"))
        .ffmpeg_path("ffmpeg".into())
        .build();

    let lines: Vec<String> = (1..=60).map(|i| format!("line {i}")).collect();
    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let spawner = MockFfmpegSpawner::succeeding(b"mp3".to_vec()).with_log_lines(&line_refs);

    let reporter = RecordingReporter::default();
    set_progress_reporter(Box::new(reporter.clone()));
    let media = open_local(&source).unwrap();
    let output = extract_to_mp3(&spawner, &config, &media, &Mp3Options::default()).unwrap();
    clear_progress_reporter();

    let recorded = reporter.0.lock().unwrap();
    assert_eq!(recorded.encoder_lines, vec!["line 25", "line 50"]);
    assert_eq!(recorded.cleared, 1);
    assert!(
        recorded
            .messages
            .iter()
            .any(|(level, text)| *level == OutputLevel::Section && text == "Extracting MP3")
    );
    assert!(
        recorded
            .messages
            .iter()
            .any(|(level, _)| *level == OutputLevel::Success)
    );
    assert!(
        recorded
            .statuses
            .contains(&("File".to_string(), output.file_name().to_string()))
    );
    assert!(
        recorded
            .statuses
            .contains(&("Bitrate".to_string(), "192k".to_string()))
    );
    assert!(
        recorded
            .messages
            .contains(&(OutputLevel::Debug, "ffmpeg wrote 60 log lines".to_string()))
    );
    // Mock output carries no parsed duration
    assert!(!recorded.statuses.iter().any(|(label, _)| label == "Duration"));
}
