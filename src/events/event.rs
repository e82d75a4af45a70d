//! Typed domain events and their ingestion metadata.
//!
//! The normalizer maps each useful log line onto exactly one of a closed
//! set of event kinds. Sequence numbers are assigned at ingestion — the
//! vendor's own line ordering and embedded timestamps are not trusted —
//! and are scoped to a source-file epoch, which advances whenever the
//! tailer detects truncation or rotation.
//!
//! Events are immutable once created and consumed exactly once by the
//! reconstructor.

use serde::{Deserialize, Serialize};

use crate::core::{ManaPool, Phase, PlayerId, Step};
use crate::cards::{CardId, InstanceId};
use crate::state::Zone;

/// Ingestion-order sequence number, monotonically increasing per epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeqNo(pub u64);

impl SeqNo {
    #[must_use]
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SeqNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source-file identity epoch. Advances on truncation or rotation so that
/// sequence monotonicity is scoped to one file incarnation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(pub u32);

impl Epoch {
    #[must_use]
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    /// The epoch after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A raw line handed from the tailer to the normalizer.
///
/// Transient: discarded after normalization. The timestamp stays embedded
/// in `text` exactly as logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawLogLine {
    pub epoch: Epoch,
    pub text: String,
}

impl RawLogLine {
    #[must_use]
    pub fn new(epoch: Epoch, text: impl Into<String>) -> Self {
        Self {
            epoch,
            text: text.into(),
        }
    }
}

/// How a life change is expressed by the source payload.
///
/// The schema disambiguates: the reconstructor applies whichever the
/// event declares and never guesses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeTotal {
    Absolute(i32),
    Delta(i32),
}

/// A card instance moved between zones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneChange {
    pub instance: InstanceId,
    /// Card definition, when the payload revealed it.
    pub card: Option<CardId>,
    /// Source zone as reported. `None` when the log's first mention of the
    /// instance is its arrival.
    pub from: Option<Zone>,
    pub to: Zone,
    pub owner: PlayerId,
    /// Whether the moving card's identity was visible to the observer.
    pub visible: bool,
    /// Explicit destination position, only ever reported for ordered zones.
    pub position: Option<usize>,
}

/// A player's life total changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeChange {
    pub player: PlayerId,
    pub value: LifeTotal,
}

/// The turn advanced to a new phase or step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub phase: Phase,
    pub step: Option<Step>,
    pub active: PlayerId,
}

/// A new turn began.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnChange {
    pub turn: u32,
    pub active: PlayerId,
}

/// A player's mana pool was reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaChange {
    pub player: PlayerId,
    pub pool: ManaPool,
}

/// Something entered or left the stack.
///
/// Only a marker: the advisor gates instant-speed legality on stack
/// occupancy, it does not model resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackEvent {
    Push {
        instance: Option<InstanceId>,
        card: Option<CardId>,
    },
    Pop,
}

/// Payload of one domain event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    ZoneChange(ZoneChange),
    LifeChange(LifeChange),
    PhaseChange(PhaseChange),
    TurnChange(TurnChange),
    ManaChange(ManaChange),
    Stack(StackEvent),
    /// Well-formed but unrecognized payload shape. Preserved so the
    /// reconstructor can decide whether to ignore or flag it.
    Unknown { label: String },
}

/// One normalized event, immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub seq: SeqNo,
    pub epoch: Epoch,
    pub payload: EventPayload,
}

impl DomainEvent {
    #[must_use]
    pub fn new(seq: SeqNo, epoch: Epoch, payload: EventPayload) -> Self {
        Self { seq, epoch, payload }
    }

    /// Short label for logging.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match &self.payload {
            EventPayload::ZoneChange(_) => "zone_change",
            EventPayload::LifeChange(_) => "life_change",
            EventPayload::PhaseChange(_) => "phase_change",
            EventPayload::TurnChange(_) => "turn_change",
            EventPayload::ManaChange(_) => "mana_change",
            EventPayload::Stack(_) => "stack",
            EventPayload::Unknown { .. } => "unknown",
        }
    }
}
