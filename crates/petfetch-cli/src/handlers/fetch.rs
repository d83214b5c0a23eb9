//! `fetch` command handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use petfetch_core::{BatchPair, PetKind};
use tracing::info;

use crate::bootstrap::CliContext;

/// Fetch one image of `kind` into `destination`.
///
/// Unlike `run`, a failure here is the command's failure.
pub async fn execute(ctx: &CliContext, kind: &str, destination: PathBuf) -> Result<()> {
    let pair = BatchPair::new(PetKind::from(kind), destination);
    let fetched = ctx
        .driver
        .fetch(&pair)
        .await
        .with_context(|| format!("Failed to fetch {} into {}", pair.kind, pair.destination.display()))?;

    info!(url = %fetched.url, "Image server returned URL");
    println!(
        "✓ Saved {} ({} bytes)",
        pair.destination.display(),
        fetched.bytes
    );
    Ok(())
}
