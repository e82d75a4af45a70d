//! # arena-advisor
//!
//! A real-time match companion: tails the game client's append-only event
//! log, reconstructs a structured model of the match in progress, and
//! emits a ranked set of legal-action recommendations at each decision
//! point. It observes and advises; it never acts on the player's behalf.
//!
//! ## Design Principles
//!
//! 1. **One-directional pipeline**: tailer → normalizer → reconstructor →
//!    (legality + scoring over the card knowledge store) → bus. Every
//!    stage is independently testable with canned input at its boundary.
//!
//! 2. **Robust to a hostile log**: duplicate, out-of-order, split, and
//!    malformed lines are normal conditions. Sequence numbers are
//!    assigned at ingestion and scoped to a file epoch; reconstruction
//!    never stalls on bad input.
//!
//! 3. **Partial information, honestly modeled**: only the observing
//!    player's hand is fully known. The opponent's hand is a count plus
//!    revealed identities — known-present, known-absent, and unknown are
//!    distinct answers, never conflated.
//!
//! 4. **Conservative rules model**: anything the knowledge store cannot
//!    verify is excluded from recommendations rather than guessed at.
//!
//! ## Modules
//!
//! - `core`: seats, mana, turn structure
//! - `cards`: static card data, instances, the knowledge store
//! - `events`: the closed domain-event set and ingestion metadata
//! - `tailer`: log file follower with truncation/rotation epochs
//! - `normalizer`: raw lines to events, with split-payload buffering
//! - `state`: zones, snapshots, the sequential reconstruction fold
//! - `rules`: legality evaluation at the MVP rules scope
//! - `engine`: heuristic scoring and deterministic ranking
//! - `bus` / `pipeline`: delivery and stage wiring

pub mod bus;
pub mod cards;
pub mod core;
pub mod engine;
pub mod error;
pub mod events;
pub mod normalizer;
pub mod pipeline;
pub mod rules;
pub mod state;
pub mod tailer;

// Re-export commonly used types
pub use crate::core::{ManaColor, ManaCost, ManaPool, Phase, PlayerId, PlayerPair, Step};

pub use crate::cards::{
    AbilityEffect, AbilityTag, ActivatedAbility, CardData, CardId, CardInstance, CardKnowledge,
    CardType, InstanceId,
};

pub use crate::events::{
    DomainEvent, Epoch, EventPayload, LifeTotal, RawLogLine, SeqNo, StackEvent,
};

pub use crate::state::{
    apply_event, CardPresence, Checkpoint, GameStateSnapshot, HandSlot, PlayerState,
    Reconstructor, Zone, ZoneSet,
};

pub use crate::rules::{legal_actions, ActionDetail, ActionKind, LegalAction, Speed};

pub use crate::engine::{rank, score_action, ScoreWeights, ScoredRecommendation};

pub use crate::bus::{AdviceBus, Delivery};

pub use crate::pipeline::{
    AdvisorHandle, Pipeline, PipelineConfig, PipelineStatus, ReplaySummary,
};

pub use crate::tailer::{LogTailer, TailerConfig};

pub use crate::normalizer::Normalizer;

pub use crate::error::{
    InvariantViolation, KnowledgeError, PipelineError, RecoverableParseError,
    SourceUnavailableError, StaleComputationError, UnknownCardError,
};
