//! Log filter selection.

/// Filter directive for the tracing subscriber.
///
/// `--verbose` always wins; otherwise `RUST_LOG` if set, else `info`.
pub fn filter_directive(verbose: bool, rust_log: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}
