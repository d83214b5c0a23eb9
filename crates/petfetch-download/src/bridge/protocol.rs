//! Response decoding for image server output.
//!
//! The server prints its answer somewhere on stdout, possibly mixed with
//! log text. Each line is decoded against the schema below; the first line
//! that carries a result decides the outcome.
//!
//! # Protocol Schema
//!
//! Accepted result lines (JSON objects):
//!
//! ```json
//! {"imageUrl": "https://cdn.example/cat.jpg"}
//! {"jsonrpc": "2.0", "id": 1, "result": {"imageUrl": "https://cdn.example/cat.jpg"}}
//! {"jsonrpc": "2.0", "id": 1, "result": {"content": [{"type": "text", "text": "{\"imageUrl\": \"...\"}"}]}}
//! {"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "unknown kind"}}
//! ```
//!
//! Lines that are not JSON objects are diagnostics and are skipped. JSON
//! objects without `imageUrl` are skipped too unless they carry a `jsonrpc`
//! member, so structured log lines with `result` or `error` fields pass.

use petfetch_core::{ImageUrl, ScanError};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Field holding the image URL.
pub const IMAGE_URL_FIELD: &str = "imageUrl";

// ============================================================================
// Line Events
// ============================================================================

/// What a single stdout line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseLine {
    /// Free-form text (logs, banners).
    Diagnostic,
    /// A JSON object that is not a response (notifications and the like).
    Ignored,
    /// The image URL.
    Image(ImageUrl),
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default, deserialize_with = "present")]
    jsonrpc: Option<Value>,
    #[serde(rename = "imageUrl", default, deserialize_with = "present")]
    image_url: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    error: Option<Value>,
}

/// `Some` whenever the member exists, including an explicit `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
struct RawRpcError {
    code: i64,
    message: String,
}

/// Decode a single line of server output.
///
/// `result` and `error` members only count inside a JSON-RPC envelope
/// (`jsonrpc` present); elsewhere they are structured log fields.
///
/// Returns `Err` for lines that are responses but malformed (shape
/// mismatch) or that report a server-side error.
pub fn decode_line(line: &str) -> Result<ResponseLine, ScanError> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return Ok(ResponseLine::Diagnostic);
    }

    let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) else {
        return Ok(ResponseLine::Diagnostic);
    };

    let envelope: RawEnvelope = serde_json::from_value(Value::Object(object))
        .map_err(|e| ScanError::Shape(e.to_string()))?;

    if let Some(value) = envelope.image_url {
        return url_from_value(&value).map(ResponseLine::Image);
    }

    if envelope.jsonrpc.is_none() {
        return Ok(ResponseLine::Ignored);
    }

    if let Some(error) = envelope.error {
        let error: RawRpcError = serde_json::from_value(error)
            .map_err(|e| ScanError::Shape(format!("malformed error member: {e}")))?;
        return Err(ScanError::Server {
            code: error.code,
            message: error.message,
        });
    }

    if let Some(result) = envelope.result {
        return url_from_result(&result).map(ResponseLine::Image);
    }

    Ok(ResponseLine::Ignored)
}

/// Decode the full stdout of one invocation and return the image URL.
///
/// Lines are examined in order; the first result line wins.
pub fn scan_response(stdout: &str) -> Result<ImageUrl, ScanError> {
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        match decode_line(line)? {
            ResponseLine::Image(url) => return Ok(url),
            ResponseLine::Diagnostic => debug!(line, "Skipping non-protocol output"),
            ResponseLine::Ignored => debug!(line, "Skipping unrelated message"),
        }
    }
    Err(ScanError::NoResult)
}

fn url_from_value(value: &Value) -> Result<ImageUrl, ScanError> {
    match value {
        Value::String(raw) => ImageUrl::parse(raw),
        other => Err(ScanError::Shape(format!(
            "{IMAGE_URL_FIELD} must be a string, got {other}"
        ))),
    }
}

fn url_from_result(result: &Value) -> Result<ImageUrl, ScanError> {
    let Value::Object(object) = result else {
        return Err(ScanError::Shape(format!(
            "result must be an object, got {result}"
        )));
    };

    if let Some(value) = object.get(IMAGE_URL_FIELD) {
        return url_from_value(value);
    }

    if let Some(url) = url_from_tool_content(object)? {
        return Ok(url);
    }

    Err(ScanError::Shape(format!(
        "result carries no {IMAGE_URL_FIELD}"
    )))
}

/// MCP tool results wrap their payload in `content: [{type: "text", text}]`.
/// The text is either a JSON object with `imageUrl` or the bare URL.
fn url_from_tool_content(object: &Map<String, Value>) -> Result<Option<ImageUrl>, ScanError> {
    let Some(Value::Array(items)) = object.get("content") else {
        return Ok(None);
    };

    let texts = items.iter().filter_map(|item| {
        (item.get("type").and_then(Value::as_str) == Some("text"))
            .then(|| item.get("text").and_then(Value::as_str))
            .flatten()
    });

    for text in texts {
        let text = text.trim();
        if let Ok(Value::Object(inner)) = serde_json::from_str::<Value>(text) {
            if let Some(value) = inner.get(IMAGE_URL_FIELD) {
                return url_from_value(value).map(Some);
            }
        } else if text.starts_with("http://") || text.starts_with("https://") {
            return ImageUrl::parse(text).map(Some);
        }
    }

    Ok(None)
}

// ============================================================================
// Tests
// ============================================================================
