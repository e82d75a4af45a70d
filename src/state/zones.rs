//! Zones and per-player zone contents.
//!
//! ## Ordering
//!
//! Zone order matters only for Library and Stack. The battlefield,
//! graveyard, exile, and command contents are kept in entry order for
//! stable iteration, but nothing in the rules reads that order.
//!
//! ## Hidden information
//!
//! The opponent's hand is never materialized as identified instances.
//! Each hand is a list of slots: the local player's slots hold instance
//! IDs (`Held`), the opponent's hold `Revealed` card IDs when the log
//! showed the card and `Hidden` otherwise. "Known absent" is expressed by
//! a slot's removal, and queried through `CardPresence`.
//!
//! ## Library opacity
//!
//! Libraries are opaque counts. A move to the library records identity at
//! a position only when the event explicitly supplied one; any removal
//! from the library drops all recorded positions, because the advisor must
//! never invent ordering the log did not provide.
//!
//! The stack is shared between players and lives on the snapshot, not
//! here; `Zone::Stack` exists for event payloads.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, InstanceId};

/// A named region holding card instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Hand,
    Battlefield,
    Graveyard,
    Exile,
    Stack,
    Library,
    Command,
}

impl Zone {
    /// Parse a vendor zone token.
    #[must_use]
    pub fn from_log_token(token: &str) -> Option<Self> {
        match token {
            "ZoneType_Hand" => Some(Zone::Hand),
            "ZoneType_Battlefield" => Some(Zone::Battlefield),
            "ZoneType_Graveyard" => Some(Zone::Graveyard),
            "ZoneType_Exile" => Some(Zone::Exile),
            "ZoneType_Stack" => Some(Zone::Stack),
            "ZoneType_Library" => Some(Zone::Library),
            "ZoneType_Command" => Some(Zone::Command),
            _ => None,
        }
    }

    /// Whether card order within the zone is meaningful.
    #[must_use]
    pub fn is_ordered(self) -> bool {
        matches!(self, Zone::Library | Zone::Stack)
    }
}

/// One slot in a hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandSlot {
    /// A fully-known card of the observing player.
    Held(InstanceId),
    /// An opponent card whose identity the log revealed.
    Revealed(CardId),
    /// An opponent card of unknown identity.
    Hidden,
}

/// Answer to "is this card in that hand?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPresence {
    KnownPresent,
    KnownAbsent,
    Unknown,
}

/// Opaque library model: a count, plus explicitly-reported positions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryZone {
    pub count: usize,
    known: Vector<(usize, InstanceId)>,
}

impl LibraryZone {
    /// A card entered the library with no reported position.
    pub fn add_opaque(&mut self) {
        self.count += 1;
    }

    /// A card entered the library at an explicitly reported position.
    pub fn add_at(&mut self, position: usize, instance: InstanceId) {
        self.count += 1;
        self.known.push_back((position, instance));
    }

    /// A card left the library. Returns false if the count was already
    /// zero.
    ///
    /// Any removal makes recorded positions stale; callers follow up
    /// with `clear_known` and retire the returned identities.
    pub fn remove_one(&mut self) -> bool {
        if self.count == 0 {
            return false;
        }
        self.count -= 1;
        true
    }

    /// Drop every recorded position, returning the identities that were
    /// tracked there so the caller can retire them.
    pub fn clear_known(&mut self) -> Vec<InstanceId> {
        let ids = self.known.iter().map(|(_, i)| *i).collect();
        self.known.clear();
        ids
    }

    /// Instance known to sit at a reported position, if any.
    #[must_use]
    pub fn known_at(&self, position: usize) -> Option<InstanceId> {
        self.known
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, i)| *i)
    }

    /// Whether an instance is tracked at a known position.
    #[must_use]
    pub fn holds(&self, instance: InstanceId) -> bool {
        self.known.iter().any(|(_, i)| *i == instance)
    }
}

/// All zones belonging to one player.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    pub hand: Vector<HandSlot>,
    pub battlefield: Vector<InstanceId>,
    pub graveyard: Vector<InstanceId>,
    pub exile: Vector<InstanceId>,
    pub command: Vector<InstanceId>,
    pub library: LibraryZone,
}

impl ZoneSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand.len()
    }

    /// List-backed contents of an unordered tracked zone.
    #[must_use]
    pub fn tracked(&self, zone: Zone) -> Option<&Vector<InstanceId>> {
        match zone {
            Zone::Battlefield => Some(&self.battlefield),
            Zone::Graveyard => Some(&self.graveyard),
            Zone::Exile => Some(&self.exile),
            Zone::Command => Some(&self.command),
            _ => None,
        }
    }

    /// Mutable list-backed contents of an unordered tracked zone.
    pub fn tracked_mut(&mut self, zone: Zone) -> Option<&mut Vector<InstanceId>> {
        match zone {
            Zone::Battlefield => Some(&mut self.battlefield),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Exile => Some(&mut self.exile),
            Zone::Command => Some(&mut self.command),
            _ => None,
        }
    }

    /// Whether a tracked zone or the hand contains the instance.
    #[must_use]
    pub fn contains(&self, instance: InstanceId) -> bool {
        self.hand
            .iter()
            .any(|slot| matches!(slot, HandSlot::Held(i) if *i == instance))
            || self.battlefield.contains(&instance)
            || self.graveyard.contains(&instance)
            || self.exile.contains(&instance)
            || self.command.contains(&instance)
            || self.library.holds(instance)
    }

    /// Tri-state presence of a card in this hand.
    ///
    /// `resolve` maps a held instance to its card definition; the caller
    /// provides it because the instance table lives on the snapshot.
    pub fn hand_presence(
        &self,
        card: CardId,
        resolve: impl Fn(InstanceId) -> Option<CardId>,
    ) -> CardPresence {
        let mut any_hidden = false;
        for slot in &self.hand {
            match slot {
                HandSlot::Revealed(c) if *c == card => return CardPresence::KnownPresent,
                HandSlot::Held(i) => {
                    match resolve(*i) {
                        Some(c) if c == card => return CardPresence::KnownPresent,
                        Some(_) => {}
                        // Held but unidentified (face-down): identity open
                        None => any_hidden = true,
                    }
                }
                HandSlot::Revealed(_) => {}
                HandSlot::Hidden => any_hidden = true,
            }
        }
        if any_hidden {
            CardPresence::Unknown
        } else {
            CardPresence::KnownAbsent
        }
    }
}
