//! The one-shot request sent to the image server's stdin.
//!
//! The message is shaped like a JSON-RPC 2.0 call:
//!
//! ```json
//! {"jsonrpc": "2.0", "id": 1, "method": "get_pet_image", "params": {"kind": "cat"}}
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::PetKind;

/// Protocol marker written into every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Argument mapping of a fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Which kind of pet image to return.
    pub kind: PetKind,
}

/// A single fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: FetchParams,
}

impl FetchRequest {
    /// Create a request with the default protocol marker.
    pub fn new(id: u64, method: impl Into<String>, kind: PetKind) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params: FetchParams { kind },
        }
    }

    /// Override the protocol marker.
    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.jsonrpc = version.into();
        self
    }

    /// Serialize onto a single newline-terminated line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Builds requests with monotonically increasing ids.
///
/// Shared by every pair of a batch so ids stay unique within a run.
#[derive(Debug)]
pub struct RequestFactory {
    method: String,
    protocol_version: String,
    next_id: AtomicU64,
}

impl RequestFactory {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            protocol_version: JSONRPC_VERSION.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Build the next request for `kind`.
    pub fn build(&self, kind: PetKind) -> FetchRequest {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        FetchRequest::new(id, self.method.clone(), kind)
            .with_protocol_version(self.protocol_version.clone())
    }
}
