//! Command-line adapter for petfetch.
//!
//! `main.rs` parses arguments, initializes logging and dispatches to
//! [`handlers`]; everything it needs is composed in [`bootstrap`].
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, RunArgs};
pub use error::CliError;
pub use parser::Cli;
