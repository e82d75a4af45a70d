//! Per-player reconstructed state.

use serde::{Deserialize, Serialize};

use super::zones::ZoneSet;
use crate::core::ManaPool;

/// Starting life total for a standard match.
pub const STARTING_LIFE: i32 = 20;

/// Everything the reconstruction tracks about one seat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub life: i32,

    /// Last reported available mana.
    pub pool: ManaPool,

    pub zones: ZoneSet,

    /// Whether this player has used their land drop this turn.
    pub land_drop_used: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            life: STARTING_LIFE,
            pool: ManaPool::empty(),
            zones: ZoneSet::new(),
            land_drop_used: false,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}
