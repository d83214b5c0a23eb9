//! Image server bridge.
//!
//! - `process`: spawn the server, send one request, collect its output
//! - `protocol`: decode the output into an image URL

pub mod process;
pub mod protocol;

pub use process::ChildProcessInvoker;
pub use protocol::{IMAGE_URL_FIELD, ResponseLine, decode_line, scan_response};
