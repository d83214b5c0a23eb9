//! Command handlers.
//!
//! Handlers follow the pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that call the batch driver and format output for the terminal

pub mod config;
pub mod fetch;
pub mod run;
pub mod tools;
