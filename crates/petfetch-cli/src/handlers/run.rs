//! `run` command handler.

use anyhow::{Result, bail};
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::presentation::render_report;

/// Run the configured batch and print a summary.
///
/// Failed pairs are listed in the summary but do not fail the command.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let pairs = ctx.settings.resolved_pairs();

    let report = tokio::select! {
        report = ctx.driver.run(&pairs) => report,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping batch");
            bail!("interrupted");
        }
    };

    println!();
    print!("{}", render_report(&report));
    Ok(())
}
