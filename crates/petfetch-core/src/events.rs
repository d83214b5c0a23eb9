//! Batch progress events.
//!
//! The batch driver emits these through a
//! [`BatchEventSink`](crate::ports::BatchEventSink); adapters decide how to
//! present them (log lines, progress bars, JSON).

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::PetKind;
use crate::errors::FetchStage;

/// Events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A batch with `total` pairs is starting.
    Started { total: usize },

    /// Pair `index` moved from pending to its first stage.
    PairStarted {
        index: usize,
        kind: PetKind,
        destination: PathBuf,
    },

    /// Pair `index` entered `stage`.
    StageChanged { index: usize, stage: FetchStage },

    /// Pair `index` finished and its file is in place.
    PairCompleted {
        index: usize,
        kind: PetKind,
        destination: PathBuf,
        url: String,
        bytes: u64,
    },

    /// Pair `index` failed in `stage`.
    PairFailed {
        index: usize,
        kind: PetKind,
        destination: PathBuf,
        stage: FetchStage,
        error: String,
    },

    /// All pairs were processed.
    Finished { succeeded: usize, failed: usize },
}

impl BatchEvent {
    /// Index of the pair this event refers to, if any.
    pub const fn pair_index(&self) -> Option<usize> {
        match self {
            Self::PairStarted { index, .. }
            | Self::StageChanged { index, .. }
            | Self::PairCompleted { index, .. }
            | Self::PairFailed { index, .. } => Some(*index),
            Self::Started { .. } | Self::Finished { .. } => None,
        }
    }

    /// Whether this event ends a pair's lifecycle.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::PairCompleted { .. } | Self::PairFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = BatchEvent::StageChanged {
            index: 2,
            stage: FetchStage::Scanning,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "stage_changed");
        assert_eq!(json["stage"], "scanning");
    }

    #[test]
    fn test_pair_index_and_terminal() {
        let failed = BatchEvent::PairFailed {
            index: 1,
            kind: PetKind::Dog,
            destination: PathBuf::from("dog.jpg"),
            stage: FetchStage::Invoking,
            error: "boom".to_string(),
        };
        assert_eq!(failed.pair_index(), Some(1));
        assert!(failed.is_terminal());

        let finished = BatchEvent::Finished {
            succeeded: 1,
            failed: 1,
        };
        assert_eq!(finished.pair_index(), None);
        assert!(!finished.is_terminal());
    }
}
