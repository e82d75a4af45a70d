//! Legal actions.
//!
//! A `LegalAction` is one atomic step the observing player could take,
//! tagged with the snapshot version it was computed against. Anything
//! computed against version N is invalid once a newer snapshot exists and
//! must be recomputed, never silently reused.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::InstanceId;
use crate::core::ManaCost;
use crate::error::StaleComputationError;
use crate::events::SeqNo;

/// Action category, ordered for deterministic tie-breaking:
/// `PlayLand < CastSpell < ActivateAbility < DeclareAttackers <
/// PassPriority`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ActionKind {
    PlayLand,
    CastSpell,
    ActivateAbility,
    DeclareAttackers,
    PassPriority,
}

/// Kind-specific data of a legal action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionDetail {
    PlayLand {
        card: InstanceId,
    },
    CastSpell {
        card: InstanceId,
        cost: ManaCost,
    },
    ActivateAbility {
        source: InstanceId,
        /// Index into the card's allowlist entry.
        ability: usize,
        cost: ManaCost,
    },
    DeclareAttackers {
        attackers: SmallVec<[InstanceId; 4]>,
        total_power: i32,
    },
    PassPriority,
}

/// A move permitted by the partial rules model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegalAction {
    /// Snapshot version this action was computed against.
    pub version: SeqNo,
    pub detail: ActionDetail,
}

impl LegalAction {
    #[must_use]
    pub fn new(version: SeqNo, detail: ActionDetail) -> Self {
        Self { version, detail }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match &self.detail {
            ActionDetail::PlayLand { .. } => ActionKind::PlayLand,
            ActionDetail::CastSpell { .. } => ActionKind::CastSpell,
            ActionDetail::ActivateAbility { .. } => ActionKind::ActivateAbility,
            ActionDetail::DeclareAttackers { .. } => ActionKind::DeclareAttackers,
            ActionDetail::PassPriority => ActionKind::PassPriority,
        }
    }

    /// The source instance, if the action has one.
    #[must_use]
    pub fn source(&self) -> Option<InstanceId> {
        match &self.detail {
            ActionDetail::PlayLand { card } | ActionDetail::CastSpell { card, .. } => Some(*card),
            ActionDetail::ActivateAbility { source, .. } => Some(*source),
            ActionDetail::DeclareAttackers { attackers, .. } => attackers.first().copied(),
            ActionDetail::PassPriority => None,
        }
    }

    /// Mana this action would spend.
    #[must_use]
    pub fn cost(&self) -> ManaCost {
        match &self.detail {
            ActionDetail::CastSpell { cost, .. } | ActionDetail::ActivateAbility { cost, .. } => {
                *cost
            }
            _ => ManaCost::free(),
        }
    }

    /// Validate this action against the current snapshot version.
    pub fn check_fresh(&self, current: SeqNo) -> Result<(), StaleComputationError> {
        if current > self.version {
            Err(StaleComputationError {
                computed_against: self.version,
                current,
            })
        } else {
            Ok(())
        }
    }
}
