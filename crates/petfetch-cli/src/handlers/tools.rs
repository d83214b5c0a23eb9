//! `tools` command handler.

use anyhow::Result;
use petfetch_core::PET_SERVER;
use serde_json::json;

use crate::bootstrap::CliContext;

/// Print the image server's tool catalog.
pub fn execute(ctx: &CliContext, as_json: bool) -> Result<()> {
    let command = ctx.settings.effective_server_command();
    if as_json {
        let value = json!({
            "command": command,
            "server": PET_SERVER,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", PET_SERVER.render_summary(&command));
    }
    Ok(())
}
