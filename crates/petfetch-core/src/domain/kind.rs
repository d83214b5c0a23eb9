//! Pet kind selector sent to the image server.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of pet image to request.
///
/// Serialized as the lowercase selector string (`"cat"`, `"dog"`, ...).
/// Unknown selectors are kept verbatim in [`PetKind::Other`] so servers
/// that understand more kinds can still be driven.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PetKind {
    Cat,
    Dog,
    Fox,
    Bird,
    Other(String),
}

impl PetKind {
    /// Selector string as sent in the request `kind` argument.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cat => "cat",
            Self::Dog => "dog",
            Self::Fox => "fox",
            Self::Bird => "bird",
            Self::Other(other) => other,
        }
    }

    /// Whether this is one of the built-in kinds.
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for PetKind {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "cat" | "cats" => Self::Cat,
            "dog" | "dogs" => Self::Dog,
            "fox" | "foxes" => Self::Fox,
            "bird" | "birds" => Self::Bird,
            _ => Self::Other(normalized),
        }
    }
}

impl From<String> for PetKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<PetKind> for String {
    fn from(kind: PetKind) -> Self {
        match kind {
            PetKind::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for PetKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for PetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
