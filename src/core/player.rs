//! Player identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! Type-safe wrapper around the seat number the game client assigns in its
//! log output. Seat numbers are opaque: the advisor never renumbers them,
//! it only distinguishes the local (observing) seat from the opponent.
//!
//! ## PlayerPair
//!
//! Two-seat data storage keyed by `PlayerId`. A match always has exactly
//! two seats; lookups for a seat the log never introduced return `None`
//! rather than panicking, since malformed log lines can reference bogus
//! seat numbers.

use serde::{Deserialize, Serialize};

/// Seat identifier as it appears in the event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a player ID from a raw seat number.
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    /// Get the raw seat number.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage for a two-player match.
///
/// Keyed by `PlayerId` rather than positional index so that the seat
/// numbers from the log can be used directly.
///
/// ## Example
///
/// ```
/// use arena_advisor::core::{PlayerId, PlayerPair};
///
/// let pair = PlayerPair::new((PlayerId::new(1), 20), (PlayerId::new(2), 20));
///
/// assert_eq!(pair.get(PlayerId::new(1)), Some(&20));
/// assert_eq!(pair.get(PlayerId::new(9)), None);
/// assert_eq!(pair.other(PlayerId::new(1)), Some(PlayerId::new(2)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPair<T> {
    seats: [PlayerId; 2],
    data: [T; 2],
}

impl<T> PlayerPair<T> {
    /// Create a pair from two (seat, value) entries.
    ///
    /// Panics if both entries use the same seat.
    #[must_use]
    pub fn new(a: (PlayerId, T), b: (PlayerId, T)) -> Self {
        assert!(a.0 != b.0, "both entries use seat {}", a.0 .0);
        Self {
            seats: [a.0, b.0],
            data: [a.1, b.1],
        }
    }

    /// Get the two seat IDs.
    #[must_use]
    pub fn seats(&self) -> [PlayerId; 2] {
        self.seats
    }

    /// Check whether a seat exists in this pair.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.seats.contains(&player)
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.index_of(player).map(|i| &self.data[i])
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.index_of(player).map(move |i| &mut self.data[i])
    }

    /// Get the seat opposite to `player`.
    #[must_use]
    pub fn other(&self, player: PlayerId) -> Option<PlayerId> {
        match self.index_of(player) {
            Some(0) => Some(self.seats[1]),
            Some(_) => Some(self.seats[0]),
            None => None,
        }
    }

    /// Iterate over (seat, data) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.seats.iter().copied().zip(self.data.iter())
    }

    /// Iterate over (seat, mutable data) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.seats.iter().copied().zip(self.data.iter_mut())
    }

    fn index_of(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|&s| s == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p = PlayerId::new(1);
        assert_eq!(p.raw(), 1);
        assert_eq!(format!("{}", p), "Seat 1");
    }

    #[test]
    fn test_pair_get() {
        let pair = PlayerPair::new((PlayerId::new(1), "a"), (PlayerId::new(2), "b"));

        assert_eq!(pair.get(PlayerId::new(1)), Some(&"a"));
        assert_eq!(pair.get(PlayerId::new(2)), Some(&"b"));
        assert_eq!(pair.get(PlayerId::new(3)), None);
        assert!(pair.contains(PlayerId::new(2)));
        assert!(!pair.contains(PlayerId::new(3)));
    }

    #[test]
    fn test_pair_other() {
        let pair = PlayerPair::new((PlayerId::new(1), 0), (PlayerId::new(2), 0));

        assert_eq!(pair.other(PlayerId::new(1)), Some(PlayerId::new(2)));
        assert_eq!(pair.other(PlayerId::new(2)), Some(PlayerId::new(1)));
        assert_eq!(pair.other(PlayerId::new(5)), None);
    }

    #[test]
    fn test_pair_mutation() {
        let mut pair = PlayerPair::new((PlayerId::new(1), 20), (PlayerId::new(2), 20));

        *pair.get_mut(PlayerId::new(2)).unwrap() = 17;
        assert_eq!(pair.get(PlayerId::new(2)), Some(&17));
        assert_eq!(pair.get(PlayerId::new(1)), Some(&20));
    }

    #[test]
    fn test_pair_iter() {
        let pair = PlayerPair::new((PlayerId::new(1), 10), (PlayerId::new(2), 20));
        let entries: Vec<_> = pair.iter().collect();

        assert_eq!(entries, vec![(PlayerId::new(1), &10), (PlayerId::new(2), &20)]);
    }

    #[test]
    #[should_panic(expected = "both entries use seat")]
    fn test_pair_duplicate_seat_panics() {
        let _ = PlayerPair::new((PlayerId::new(1), 0), (PlayerId::new(1), 0));
    }
}
