//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain transforms.

pub mod summary;

pub use summary::render_report;
