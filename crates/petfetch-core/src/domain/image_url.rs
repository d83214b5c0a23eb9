//! Image URL extracted from a server response.

use std::fmt;

use url::Url;

use crate::errors::ScanError;

/// A fetchable image URL.
///
/// Keeps the text exactly as the server sent it; the parsed form is only
/// used to validate the scheme and host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl {
    raw: String,
    parsed: Url,
}

impl ImageUrl {
    /// Validate `raw` as an `http` or `https` URL with a host.
    ///
    /// Surrounding whitespace is rejected: the URL parser would drop it,
    /// while transport selection looks at the raw text.
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        if raw.trim() != raw {
            return Err(ScanError::Shape(format!(
                "imageUrl '{raw}' has surrounding whitespace"
            )));
        }

        let parsed = Url::parse(raw)
            .map_err(|e| ScanError::Shape(format!("imageUrl '{raw}' is not a valid URL: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScanError::Shape(format!(
                "imageUrl '{raw}' has unsupported scheme '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ScanError::Shape(format!("imageUrl '{raw}' has no host")));
        }

        Ok(Self {
            raw: raw.to_string(),
            parsed,
        })
    }

    /// The URL exactly as received.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub const fn url(&self) -> &Url {
        &self.parsed
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
