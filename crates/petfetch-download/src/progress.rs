//! Console progress for batch runs.
//!
//! Presentation only. On a terminal the batch is shown as an indicatif bar
//! with one line printed per finished pair; elsewhere events go to the log.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};
use petfetch_core::{BatchEvent, BatchEventSink, FetchStage, PetKind};

use crate::batch::TracingEventSink;

const MAX_LABEL: usize = 40;

/// Pick the event sink for the console: a progress bar on a terminal,
/// log lines otherwise.
pub fn console_sink() -> Arc<dyn BatchEventSink> {
    if io::stdout().is_terminal() {
        Arc::new(BatchProgress::new())
    } else {
        Arc::new(TracingEventSink)
    }
}

// ============================================================================
// Progress Bar
// ============================================================================

/// Progress bar over the pairs of one batch.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stdout())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target);
        bar.set_style(bar_style());
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchEventSink for BatchProgress {
    fn emit(&self, event: BatchEvent) {
        match event {
            BatchEvent::Started { total } => {
                self.bar.set_length(total as u64);
                self.bar.set_position(0);
                self.bar.enable_steady_tick(Duration::from_millis(120));
            }
            BatchEvent::PairStarted {
                kind, destination, ..
            } => {
                self.bar
                    .set_message(format!("{kind} → {}", format_label(&destination)));
            }
            BatchEvent::StageChanged { index, stage } => {
                self.bar.set_message(format!("#{} {}", index + 1, stage_label(stage)));
            }
            BatchEvent::PairCompleted {
                kind,
                destination,
                bytes,
                ..
            } => {
                self.bar.println(completed_line(&kind, &destination, bytes));
                self.bar.inc(1);
            }
            BatchEvent::PairFailed {
                kind,
                destination,
                error,
                ..
            } => {
                self.bar.println(failed_line(&kind, &destination, &error));
                self.bar.inc(1);
            }
            BatchEvent::Finished { .. } => self.bar.finish_and_clear(),
        }
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("🐾 {spinner} [{bar:28.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

const fn stage_label(stage: FetchStage) -> &'static str {
    match stage {
        FetchStage::Invoking => "asking image server",
        FetchStage::Scanning => "reading response",
        FetchStage::Downloading => "downloading",
    }
}

// ============================================================================
// Line Formatting
// ============================================================================

fn completed_line(kind: &PetKind, destination: &Path, bytes: u64) -> String {
    format!(
        "✓ {kind} → {} ({})",
        destination.display(),
        HumanBytes(bytes)
    )
}

fn failed_line(kind: &PetKind, destination: &Path, error: &str) -> String {
    format!("✗ {kind} → {}: {error}", destination.display())
}

/// Destination shortened to its last [`MAX_LABEL`] characters.
fn format_label(path: &Path) -> String {
    let raw = path.display().to_string();
    let char_count = raw.chars().count();
    if char_count <= MAX_LABEL {
        return raw;
    }
    let mut buf = String::from('…');
    buf.extend(raw.chars().skip(char_count - (MAX_LABEL - 1)));
    buf
}
