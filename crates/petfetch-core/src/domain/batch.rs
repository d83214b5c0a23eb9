//! Batch pairs and run results.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::PetKind;
use crate::errors::{FetchError, FetchStage};

/// One unit of work: fetch an image of `kind` into `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPair {
    pub kind: PetKind,
    pub destination: PathBuf,
}

impl BatchPair {
    pub fn new(kind: impl Into<PetKind>, destination: impl Into<PathBuf>) -> Self {
        Self {
            kind: kind.into(),
            destination: destination.into(),
        }
    }

    /// The same pair with a relative destination resolved against `base`.
    #[must_use]
    pub fn resolved_against(&self, base: &Path) -> Self {
        if self.destination.is_absolute() {
            return self.clone();
        }
        Self {
            kind: self.kind.clone(),
            destination: base.join(&self.destination),
        }
    }
}

/// Final state of a single pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PairOutcome {
    /// The image was downloaded.
    Completed {
        /// URL the server returned.
        url: String,
        /// Bytes written to the destination.
        bytes: u64,
    },
    /// A pipeline stage failed; nothing was left at the destination.
    Failed {
        /// Stage that failed.
        stage: FetchStage,
        /// Human-readable error.
        error: String,
    },
}

impl PairOutcome {
    pub fn failed(error: &FetchError) -> Self {
        Self::Failed {
            stage: error.stage(),
            error: error.to_string(),
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Outcome of one pair, tagged with the pair itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReport {
    pub pair: BatchPair,
    pub outcome: PairOutcome,
}

/// Result of a whole batch run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub pairs: Vec<PairReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.pairs.iter().filter(|p| p.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.pairs.len() - self.succeeded()
    }

    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    /// Failures only, for summary output.
    pub fn failures(&self) -> impl Iterator<Item = &PairReport> {
        self.pairs.iter().filter(|p| !p.outcome.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;

    #[test]
    fn test_resolve_relative_destination() {
        let pair = BatchPair::new("cat", "pics/cat.jpg");
        let resolved = pair.resolved_against(Path::new("/data"));
        assert_eq!(resolved.destination, PathBuf::from("/data/pics/cat.jpg"));
    }

    #[test]
    fn test_absolute_destination_is_untouched() {
        let pair = BatchPair::new("dog", "/tmp/dog.jpg");
        assert_eq!(pair.resolved_against(Path::new("/data")), pair);
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            pairs: vec![
                PairReport {
                    pair: BatchPair::new("cat", "cat.jpg"),
                    outcome: PairOutcome::Completed {
                        url: "http://example/cat.jpg".to_string(),
                        bytes: 10,
                    },
                },
                PairReport {
                    pair: BatchPair::new("dog", "dog.jpg"),
                    outcome: PairOutcome::failed(&FetchError::Scan(ScanError::NoResult)),
                },
            ],
        };

        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.pair.kind, PetKind::Dog);
        assert!(matches!(
            failure.outcome,
            PairOutcome::Failed {
                stage: FetchStage::Scanning,
                ..
            }
        ));
    }
}
