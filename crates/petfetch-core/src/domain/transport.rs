//! Network transport selection by URL scheme.

use std::fmt;

use serde::{Deserialize, Serialize};

const SECURE_PREFIX: &str = "https://";

/// Which HTTP client a download goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// TLS transport, refuses to talk plain HTTP.
    Secure,
    /// Unencrypted HTTP transport.
    Plain,
}

impl Transport {
    /// Pick the transport from the URL's scheme prefix.
    ///
    /// `Secure` iff the URL starts with `https://` (ASCII case-insensitive).
    pub fn for_url(url: &str) -> Self {
        let is_secure = url
            .get(..SECURE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SECURE_PREFIX));
        if is_secure { Self::Secure } else { Self::Plain }
    }

    pub const fn is_secure(self) -> bool {
        matches!(self, Self::Secure)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secure => f.write_str("https"),
            Self::Plain => f.write_str("http"),
        }
    }
}
