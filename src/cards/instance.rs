//! Card instances - one physical occurrence of a card during a match.
//!
//! The instance ID comes from the log and is stable across zone moves;
//! it is never reused within a match even if the same card definition
//! re-enters later. Owner is fixed at creation; controller and zone
//! mutate over the instance's life.

use im::HashMap as ImHashMap;
use serde::{Deserialize, Serialize};

use super::card::CardId;
use crate::core::PlayerId;
use crate::state::Zone;

/// Unique identifier for a card instance within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Runtime state of one card instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Stable identity from the log.
    pub instance: InstanceId,

    /// Card definition, when the log has revealed it. A face-down or
    /// never-revealed object has `None` here.
    pub card: Option<CardId>,

    /// Owner. Immutable after creation.
    pub owner: PlayerId,

    /// Current controller.
    pub controller: PlayerId,

    /// Current zone.
    pub zone: Zone,

    pub tapped: bool,

    /// Turn number on which this instance entered the battlefield, if it
    /// is there. Drives summoning-sickness checks.
    pub turn_entered: Option<u32>,

    /// Visible counters by kind.
    pub counters: ImHashMap<String, i32>,

    /// Attached instances (auras, equipment).
    pub attachments: im::Vector<InstanceId>,
}

impl CardInstance {
    /// Create an instance entering `zone` under its owner's control.
    #[must_use]
    pub fn new(instance: InstanceId, card: Option<CardId>, owner: PlayerId, zone: Zone) -> Self {
        Self {
            instance,
            card,
            owner,
            controller: owner,
            zone,
            tapped: false,
            turn_entered: None,
            counters: ImHashMap::new(),
            attachments: im::Vector::new(),
        }
    }

    /// Whether this instance is summoning sick on `current_turn`.
    ///
    /// True when it entered the battlefield this turn. Haste is the
    /// caller's concern (it requires card knowledge).
    #[must_use]
    pub fn summoning_sick(&self, current_turn: u32) -> bool {
        self.turn_entered == Some(current_turn)
    }

    /// Counter count of a given kind.
    #[must_use]
    pub fn counter(&self, kind: &str) -> i32 {
        self.counters.get(kind).copied().unwrap_or(0)
    }
}
