//! Versioned, immutable match-state snapshots.
//!
//! A snapshot is the aggregate the rest of the pipeline reads: the two
//! `PlayerState`s, the instance table, turn/phase bookkeeping, and a
//! top-of-stack marker. Exactly one snapshot is current at a time; every
//! applied event produces a successor and the old value is never mutated
//! (it is shared by `Arc` with any number of readers).
//!
//! Persistent `im` collections make the per-event clone O(1), the same
//! reason the structures were chosen for cheap state forks elsewhere in
//! this codebase's lineage.

use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};

use super::player::PlayerState;
use super::zones::{HandSlot, Zone};
use crate::cards::{CardId, CardInstance, InstanceId};
use crate::core::{Phase, PlayerId, PlayerPair, Step};
use crate::error::InvariantViolation;
use crate::events::{Epoch, SeqNo};

/// Marker for one object on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub instance: Option<InstanceId>,
    pub card: Option<CardId>,
}

/// Point-in-time reconstruction of the full match state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    /// Sequence number of the last applied event.
    pub seq: SeqNo,
    pub epoch: Epoch,

    pub turn: u32,
    pub active: PlayerId,
    pub phase: Phase,
    pub step: Option<Step>,

    /// The observing player's seat.
    pub local: PlayerId,

    pub players: PlayerPair<PlayerState>,

    /// All identified card instances, keyed by their stable instance ID.
    pub instances: ImHashMap<InstanceId, CardInstance>,

    /// The shared stack, bottom to top.
    pub stack: Vector<StackEntry>,
}

impl GameStateSnapshot {
    /// Match-start snapshot for the given seats.
    #[must_use]
    pub fn new(local: PlayerId, opponent: PlayerId) -> Self {
        Self {
            seq: SeqNo::default(),
            epoch: Epoch::default(),
            turn: 1,
            active: local,
            phase: Phase::Beginning,
            step: None,
            local,
            players: PlayerPair::new((local, PlayerState::new()), (opponent, PlayerState::new())),
            instances: ImHashMap::new(),
            stack: Vector::new(),
        }
    }

    /// The observing player's state.
    #[must_use]
    pub fn us(&self) -> &PlayerState {
        self.players
            .get(self.local)
            .expect("local seat always present")
    }

    /// The opponent's seat.
    #[must_use]
    pub fn opponent_seat(&self) -> PlayerId {
        self.players
            .other(self.local)
            .expect("local seat always present")
    }

    /// The opponent's state.
    #[must_use]
    pub fn them(&self) -> &PlayerState {
        self.players
            .get(self.opponent_seat())
            .expect("opponent seat always present")
    }

    #[must_use]
    pub fn player(&self, seat: PlayerId) -> Option<&PlayerState> {
        self.players.get(seat)
    }

    #[must_use]
    pub fn instance(&self, id: InstanceId) -> Option<&CardInstance> {
        self.instances.get(&id)
    }

    #[must_use]
    pub fn stack_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Top-of-stack marker.
    #[must_use]
    pub fn top_of_stack(&self) -> Option<&StackEntry> {
        self.stack.last()
    }

    /// Identified instances on a seat's battlefield.
    pub fn battlefield(&self, seat: PlayerId) -> impl Iterator<Item = &CardInstance> {
        self.players
            .get(seat)
            .into_iter()
            .flat_map(|p| p.zones.battlefield.iter())
            .filter_map(|id| self.instances.get(id))
    }

    /// Verify structural invariants: every identified instance appears in
    /// exactly one zone list, and every instance in the table is placed
    /// where its zone field says it is.
    ///
    /// Stack markers are bookkeeping, not placement, so instances whose
    /// zone is `Stack` are checked against the instance table only.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen: rustc_hash::FxHashMap<InstanceId, u32> = rustc_hash::FxHashMap::default();
        let mut record = |id: InstanceId| {
            *seen.entry(id).or_insert(0) += 1;
        };

        for (_, player) in self.players.iter() {
            for slot in &player.zones.hand {
                if let HandSlot::Held(id) = slot {
                    record(*id);
                }
            }
            for zone in [Zone::Battlefield, Zone::Graveyard, Zone::Exile, Zone::Command] {
                if let Some(list) = player.zones.tracked(zone) {
                    for id in list {
                        record(*id);
                    }
                }
            }
        }

        for (&id, count) in &seen {
            if *count > 1 {
                return Err(InvariantViolation::DuplicateInstance { instance: id });
            }
        }
        for (&id, inst) in &self.instances {
            let listed = match inst.zone {
                // Identity in a library exists only at explicitly reported
                // positions
                Zone::Library => self.players.iter().any(|(_, p)| p.zones.library.holds(id)),
                Zone::Stack => true,
                _ => seen.contains_key(&id),
            };
            if !listed {
                return Err(InvariantViolation::DuplicateInstance { instance: id });
            }
        }
        Ok(())
    }
}
