//! Batch summary formatting.

use std::fmt::Write;

use petfetch_core::{BatchReport, PairOutcome};

/// Summary printed after a batch: a count line, then one line per failure.
pub fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Fetched {} of {} image(s)",
        report.succeeded(),
        report.total()
    );

    for entry in report.failures() {
        if let PairOutcome::Failed { stage, error } = &entry.outcome {
            let _ = writeln!(
                out,
                "  ✗ {} → {} [{stage}]: {error}",
                entry.pair.kind,
                entry.pair.destination.display()
            );
        }
    }
    out
}
