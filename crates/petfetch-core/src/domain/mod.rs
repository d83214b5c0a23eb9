//! Domain types for the pet image fetch pipeline.
//!
//! Pure data with no I/O. Adapters (process bridge, HTTP downloader, CLI)
//! exchange these types through the ports in [`crate::ports`].

mod batch;
mod image_url;
mod kind;
mod request;
mod transport;

pub use batch::{BatchPair, BatchReport, PairOutcome, PairReport};
pub use image_url::ImageUrl;
pub use kind::PetKind;
pub use request::{FetchParams, FetchRequest, JSONRPC_VERSION, RequestFactory};
pub use transport::Transport;
