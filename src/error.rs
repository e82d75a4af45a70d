//! Error taxonomy.
//!
//! Propagation policy: parse- and lookup-level errors are absorbed and
//! logged where they occur; only source unavailability and invariant
//! violations reach the top of a pipeline run. A stale computation is an
//! internal signal between the pipeline and its consumers, never shown to
//! the end user.

use std::path::PathBuf;

use thiserror::Error;

use crate::cards::{CardId, InstanceId};
use crate::events::SeqNo;
use crate::state::Zone;

/// A malformed or partial log payload. Skipped; the pipeline continues.
#[derive(Debug, Error)]
pub enum RecoverableParseError {
    /// A split payload never completed within the buffer budget.
    #[error("payload fragment exceeded {limit} bytes and was discarded")]
    FragmentOverflow { limit: usize },

    /// Brace-balanced payload that still failed to parse as JSON.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A card ID missing from the knowledge store. The caller proceeds with
/// degraded (empty) tags.
#[derive(Debug, Error)]
#[error("card {card} not in knowledge store")]
pub struct UnknownCardError {
    pub card: CardId,
}

/// A result computed against a snapshot that has since been superseded.
/// Discard and recompute; never surfaced to the end user.
#[derive(Debug, Error)]
#[error("computed against version {computed_against}, current is {current}")]
pub struct StaleComputationError {
    pub computed_against: SeqNo,
    pub current: SeqNo,
}

/// The log source is missing or locked beyond the retry budget. Surfaced
/// to the operator; the pipeline pauses rather than exits.
#[derive(Debug, Error)]
#[error(
    "log source {path} unavailable after {attempts} attempts: {source}. \
     Check that the game client is running and writing its log"
)]
pub struct SourceUnavailableError {
    pub path: PathBuf,
    pub attempts: u32,
    #[source]
    pub source: std::io::Error,
}

/// A state transition that invariant checking proves impossible.
/// Unrecoverable: halts the affected pipeline run.
#[derive(Debug, Error)]
pub enum InvariantViolation {
    #[error("zone change removes a card from {player}'s empty {zone:?}")]
    EmptyZoneRemoval {
        player: crate::core::PlayerId,
        zone: Zone,
    },

    #[error("instance {instance} appears in more than one zone")]
    DuplicateInstance { instance: InstanceId },

    #[error("event references seat {seat} which is not in this match")]
    UnknownSeat { seat: crate::core::PlayerId },
}

/// Failure to load the card knowledge snapshot at startup.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level pipeline failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceUnavailableError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error("replay input {path}: {source}")]
    ReplayInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_actionable() {
        let err = SourceUnavailableError {
            path: PathBuf::from("/tmp/Player.log"),
            attempts: 5,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/Player.log"));
        assert!(msg.contains("game client"));
    }

    #[test]
    fn test_stale_message() {
        let err = StaleComputationError {
            computed_against: SeqNo::new(4),
            current: SeqNo::new(6),
        };
        assert_eq!(err.to_string(), "computed against version #4, current is #6");
    }
}
