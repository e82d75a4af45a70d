//! Timing restrictions.
//!
//! Two speeds cover the MVP rules model: sorcery-speed actions need the
//! actor to be the active player, in a main phase, with an empty stack;
//! instant-speed actions are allowed whenever the actor could hold
//! priority. The advisor only evaluates moments where the observing
//! player can act, so instant speed carries no further gate here.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::state::GameStateSnapshot;

/// When an action may be taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speed {
    Sorcery,
    Instant,
}

impl Speed {
    /// Whether this speed permits acting in the given snapshot.
    #[must_use]
    pub fn permits(self, snapshot: &GameStateSnapshot, actor: PlayerId) -> bool {
        match self {
            Speed::Instant => true,
            Speed::Sorcery => {
                snapshot.active == actor && snapshot.phase.is_main() && snapshot.stack_empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;
    use crate::state::snapshot::StackEntry;

    fn snapshot() -> GameStateSnapshot {
        let mut snap = GameStateSnapshot::new(PlayerId::new(1), PlayerId::new(2));
        snap.phase = Phase::FirstMain;
        snap.active = PlayerId::new(1);
        snap
    }

    #[test]
    fn test_sorcery_speed_main_phase_empty_stack() {
        let snap = snapshot();
        assert!(Speed::Sorcery.permits(&snap, PlayerId::new(1)));
        // Not the active player
        assert!(!Speed::Sorcery.permits(&snap, PlayerId::new(2)));
    }

    #[test]
    fn test_sorcery_speed_blocked_off_main() {
        let mut snap = snapshot();
        snap.phase = Phase::Combat;
        assert!(!Speed::Sorcery.permits(&snap, PlayerId::new(1)));
    }

    #[test]
    fn test_sorcery_speed_blocked_by_stack() {
        let mut snap = snapshot();
        snap.stack.push_back(StackEntry {
            instance: None,
            card: None,
        });
        assert!(!Speed::Sorcery.permits(&snap, PlayerId::new(1)));
    }

    #[test]
    fn test_instant_speed_always_permits() {
        let mut snap = snapshot();
        snap.phase = Phase::Combat;
        snap.active = PlayerId::new(2);
        snap.stack.push_back(StackEntry {
            instance: None,
            card: None,
        });
        assert!(Speed::Instant.permits(&snap, PlayerId::new(1)));
    }
}
