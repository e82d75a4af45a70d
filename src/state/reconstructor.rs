//! Incremental state reconstruction.
//!
//! A strictly sequential fold: `apply_event(snapshot, event)` produces the
//! successor snapshot, applied in ingestion sequence order only.
//! Concurrent or reordered application is disallowed by design; the
//! `Reconstructor` wrapper enforces per-epoch monotonicity, so replaying a
//! file from the start (crash catch-up) silently skips everything already
//! applied.
//!
//! The fold is deterministic and free of wall-clock or random input:
//! applying the same event to the same snapshot always yields an identical
//! result, which is what makes replay-based testing and recovery work.
//!
//! ## Robustness rules
//!
//! - An instance first mentioned by its arrival in a visible zone is
//!   created on the spot.
//! - Opponent hand contents are never materialized as identified
//!   instances: arrivals become `Revealed`/`Hidden` slots, and the
//!   instance identity is dropped from the table.
//! - Moves to the library drop identity unless the event reported an
//!   explicit position.
//! - Life/mana/phase events naming a seat that is not in the match are
//!   skipped with a warning; a zone move that would remove a card from a
//!   provably empty hand is an invariant violation and halts the run.

use std::sync::Arc;

use tracing::{debug, warn};

use super::snapshot::{GameStateSnapshot, StackEntry};
use super::zones::{HandSlot, Zone};
use crate::cards::{CardInstance, CardKnowledge, InstanceId};
use crate::core::PlayerId;
use crate::error::InvariantViolation;
use crate::events::{DomainEvent, Epoch, EventPayload, LifeTotal, SeqNo, StackEvent, ZoneChange};

/// Stateful wrapper around the pure fold: holds the current snapshot and
/// the monotonicity gate.
pub struct Reconstructor {
    knowledge: Arc<CardKnowledge>,
    current: Arc<GameStateSnapshot>,
    applied: Option<(Epoch, SeqNo)>,
}

impl Reconstructor {
    /// Start from a match-start snapshot.
    #[must_use]
    pub fn new(local: PlayerId, opponent: PlayerId, knowledge: Arc<CardKnowledge>) -> Self {
        Self {
            knowledge,
            current: Arc::new(GameStateSnapshot::new(local, opponent)),
            applied: None,
        }
    }

    /// Seed the monotonicity gate from a durable cursor, so that a
    /// replay-from-start skips already-applied events.
    #[must_use]
    pub fn resume_from(mut self, epoch: Epoch, seq: SeqNo) -> Self {
        self.applied = Some((epoch, seq));
        self
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<GameStateSnapshot> {
        Arc::clone(&self.current)
    }

    /// Sequence gate: (epoch, seq) of the last applied event.
    #[must_use]
    pub fn last_applied(&self) -> Option<(Epoch, SeqNo)> {
        self.applied
    }

    /// Apply one event in ingestion order.
    ///
    /// Returns `Ok(None)` when the event is a duplicate or predates the
    /// gate (normal during catch-up replay), `Ok(Some(snapshot))` when a
    /// new snapshot was produced.
    pub fn apply(
        &mut self,
        event: &DomainEvent,
    ) -> Result<Option<Arc<GameStateSnapshot>>, InvariantViolation> {
        if let Some((epoch, seq)) = self.applied {
            if event.epoch < epoch || (event.epoch == epoch && event.seq <= seq) {
                debug!(
                    seq = event.seq.raw(),
                    kind = event.kind_name(),
                    "skipping already-applied event"
                );
                return Ok(None);
            }
        }

        let next = apply_event(&self.current, event, &self.knowledge)?;
        self.applied = Some((event.epoch, event.seq));
        self.current = Arc::new(next);
        Ok(Some(Arc::clone(&self.current)))
    }
}

/// The pure fold: one event against one snapshot.
///
/// Deterministic and side-effect free apart from tracing.
pub fn apply_event(
    snapshot: &GameStateSnapshot,
    event: &DomainEvent,
    knowledge: &CardKnowledge,
) -> Result<GameStateSnapshot, InvariantViolation> {
    let mut next = snapshot.clone();
    next.seq = event.seq;
    next.epoch = event.epoch;

    match &event.payload {
        EventPayload::ZoneChange(zc) => apply_zone_change(&mut next, zc, knowledge)?,

        EventPayload::LifeChange(lc) => match next.players.get_mut(lc.player) {
            Some(player) => match lc.value {
                LifeTotal::Absolute(total) => player.life = total,
                LifeTotal::Delta(delta) => player.life += delta,
            },
            None => warn!(seat = lc.player.raw(), "life change for unknown seat, skipped"),
        },

        EventPayload::PhaseChange(pc) => {
            if next.players.contains(pc.active) {
                next.active = pc.active;
            } else {
                warn!(seat = pc.active.raw(), "phase change names unknown seat");
            }
            next.phase = pc.phase;
            next.step = pc.step;
        }

        EventPayload::TurnChange(tc) => {
            next.turn = tc.turn;
            next.phase = crate::core::Phase::Beginning;
            next.step = None;
            match next.players.get_mut(tc.active) {
                Some(player) => {
                    next.active = tc.active;
                    // Per-turn flags reset for the new active player only
                    player.land_drop_used = false;
                    let untapped: Vec<InstanceId> =
                        player.zones.battlefield.iter().copied().collect();
                    for id in untapped {
                        if let Some(inst) = next.instances.get_mut(&id) {
                            inst.tapped = false;
                        }
                    }
                }
                None => warn!(seat = tc.active.raw(), "turn change names unknown seat"),
            }
        }

        EventPayload::ManaChange(mc) => match next.players.get_mut(mc.player) {
            Some(player) => player.pool = mc.pool,
            None => warn!(seat = mc.player.raw(), "mana report for unknown seat, skipped"),
        },

        EventPayload::Stack(StackEvent::Push { instance, card }) => {
            next.stack.push_back(StackEntry {
                instance: *instance,
                card: *card,
            });
        }

        EventPayload::Stack(StackEvent::Pop) => {
            if next.stack.pop_back().is_none() {
                debug!("stack pop on empty stack, ignored");
            }
        }

        EventPayload::Unknown { label } => {
            debug!(label = label.as_str(), seq = event.seq.raw(), "unknown event observed");
        }
    }

    Ok(next)
}

fn apply_zone_change(
    next: &mut GameStateSnapshot,
    zc: &ZoneChange,
    knowledge: &CardKnowledge,
) -> Result<(), InvariantViolation> {
    if !next.players.contains(zc.owner) {
        return Err(InvariantViolation::UnknownSeat { seat: zc.owner });
    }
    let local = next.local;
    let current_turn = next.turn;
    let active = next.active;

    // Remove-then-insert under one transition; the caller only ever sees
    // the completed snapshot.
    let known = next.instances.get(&zc.instance).cloned();
    let origin = match &known {
        Some(inst) => {
            if let Some(reported) = zc.from {
                if reported != inst.zone {
                    debug!(
                        instance = zc.instance.raw(),
                        ?reported,
                        actual = ?inst.zone,
                        "zone change origin disagrees with model, trusting model"
                    );
                }
            }
            remove_known(next, inst.owner, inst.zone, zc.instance);
            Some(inst.zone)
        }
        None => {
            if let Some(from) = zc.from {
                remove_unseen(next, zc, from)?;
            }
            zc.from
        }
    };

    // The card identity may only now have become visible
    let card = zc.card.or_else(|| known.as_ref().and_then(|i| i.card));

    // Owner is immutable once an instance exists; zone lists always
    // follow it so that removal and insertion stay symmetric even when a
    // malformed event disagrees
    let owner_seat = known.as_ref().map_or(zc.owner, |i| i.owner);
    let player = next
        .players
        .get_mut(owner_seat)
        .expect("owner checked above");

    match zc.to {
        Zone::Hand if owner_seat == local => {
            let mut inst = known
                .unwrap_or_else(|| CardInstance::new(zc.instance, card, zc.owner, Zone::Hand));
            inst.card = card;
            inst.zone = Zone::Hand;
            inst.tapped = false;
            inst.turn_entered = None;
            inst.counters.clear();
            inst.attachments.clear();
            player.zones.hand.push_back(HandSlot::Held(zc.instance));
            next.instances.insert(zc.instance, inst);
        }

        Zone::Hand => {
            // Opponent hand: count plus revealed identity, never an
            // identified instance
            let slot = match card {
                Some(c) if zc.visible || known.is_some() => HandSlot::Revealed(c),
                _ => HandSlot::Hidden,
            };
            player.zones.hand.push_back(slot);
            next.instances.remove(&zc.instance);
        }

        Zone::Library => {
            match zc.position {
                Some(position) => {
                    player.zones.library.add_at(position, zc.instance);
                    let mut inst = known.unwrap_or_else(|| {
                        CardInstance::new(zc.instance, card, zc.owner, Zone::Library)
                    });
                    inst.zone = Zone::Library;
                    inst.tapped = false;
                    inst.turn_entered = None;
                    inst.counters.clear();
                    inst.attachments.clear();
                    next.instances.insert(zc.instance, inst);
                }
                None => {
                    // Opaque: identity is not preserved to an invented
                    // position
                    player.zones.library.add_opaque();
                    next.instances.remove(&zc.instance);
                }
            }
        }

        Zone::Stack => {
            let mut inst = known
                .unwrap_or_else(|| CardInstance::new(zc.instance, card, zc.owner, Zone::Stack));
            inst.card = card;
            inst.zone = Zone::Stack;
            next.instances.insert(zc.instance, inst);
        }

        tracked @ (Zone::Battlefield | Zone::Graveyard | Zone::Exile | Zone::Command) => {
            let mut inst = known
                .unwrap_or_else(|| CardInstance::new(zc.instance, card, zc.owner, tracked));
            inst.card = card;
            inst.zone = tracked;
            if tracked == Zone::Battlefield {
                inst.tapped = false;
                inst.turn_entered = Some(current_turn);
            } else {
                inst.tapped = false;
                inst.turn_entered = None;
                inst.counters.clear();
                inst.attachments.clear();
            }
            if let Some(list) = player.zones.tracked_mut(tracked) {
                list.push_back(zc.instance);
            }
            next.instances.insert(zc.instance, inst);

            // A land arriving from its owner's hand on their own turn
            // consumes the land drop
            if tracked == Zone::Battlefield
                && origin == Some(Zone::Hand)
                && owner_seat == active
            {
                if let Some(c) = card {
                    if knowledge.get(c).is_some_and(|data| data.is_land()) {
                        if let Some(p) = next.players.get_mut(owner_seat) {
                            p.land_drop_used = true;
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Remove an identified instance from the zone our model places it in.
fn remove_known(next: &mut GameStateSnapshot, owner: PlayerId, zone: Zone, id: InstanceId) {
    let Some(player) = next.players.get_mut(owner) else {
        return;
    };
    match zone {
        Zone::Hand => {
            if let Some(idx) = player.zones.hand.index_of(&HandSlot::Held(id)) {
                player.zones.hand.remove(idx);
            }
        }
        Zone::Library => {
            player.zones.library.remove_one();
            retire_stale_library_identities(next, owner);
        }
        Zone::Stack => {
            // Marker list is managed by stack events; nothing to unlink
        }
        tracked => {
            if let Some(list) = player.zones.tracked_mut(tracked) {
                if let Some(idx) = list.index_of(&id) {
                    list.remove(idx);
                }
            }
        }
    }
}

/// Once anything leaves a library, every explicitly recorded position in
/// it is stale. The identities tracked there evaporate with it.
fn retire_stale_library_identities(next: &mut GameStateSnapshot, owner: PlayerId) {
    let stale = match next.players.get_mut(owner) {
        Some(player) => player.zones.library.clear_known(),
        None => return,
    };
    for id in stale {
        next.instances.remove(&id);
    }
}

/// Remove an unseen instance from its reported origin zone.
fn remove_unseen(
    next: &mut GameStateSnapshot,
    zc: &ZoneChange,
    from: Zone,
) -> Result<(), InvariantViolation> {
    let owner = zc.owner;
    let Some(player) = next.players.get_mut(owner) else {
        return Err(InvariantViolation::UnknownSeat { seat: owner });
    };
    match from {
        Zone::Hand => {
            if player.zones.hand.is_empty() {
                // A card cannot leave an empty hand; the model is
                // provably inconsistent with the source
                return Err(InvariantViolation::EmptyZoneRemoval {
                    player: owner,
                    zone: Zone::Hand,
                });
            }
            // Prefer a matching revealed slot, then a hidden one, then
            // any slot that carries no instance identity. Held slots are
            // linked to the instance table and are never retired on
            // behalf of an unseen card.
            let slot_idx = zc
                .card
                .and_then(|c| player.zones.hand.index_of(&HandSlot::Revealed(c)))
                .or_else(|| player.zones.hand.index_of(&HandSlot::Hidden))
                .or_else(|| {
                    player
                        .zones
                        .hand
                        .iter()
                        .position(|slot| !matches!(slot, HandSlot::Held(_)))
                });
            match slot_idx {
                Some(idx) => {
                    player.zones.hand.remove(idx);
                }
                None => {
                    debug!(
                        seat = owner.raw(),
                        instance = zc.instance.raw(),
                        "unseen card leaving a fully identified hand, slots retained"
                    );
                }
            }
        }
        Zone::Library => {
            if player.zones.library.remove_one() {
                retire_stale_library_identities(next, owner);
            } else {
                // Library counts are opaque and may start unknown
                debug!(seat = owner.raw(), "library underflow ignored");
            }
        }
        Zone::Stack => {}
        tracked => {
            if let Some(list) = player.zones.tracked_mut(tracked) {
                if let Some(idx) = list.index_of(&zc.instance) {
                    list.remove(idx);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, CardId, CardType};
    use crate::core::ManaCost;
    use crate::events::{LifeChange, PhaseChange, TurnChange};

    fn knowledge() -> Arc<CardKnowledge> {
        let mut store = CardKnowledge::empty();
        store.register(
            CardData::new(CardId::new(1), "Forest", vec![CardType::Land]),
        );
        store.register(
            CardData::new(CardId::new(2), "Grizzly Bears", vec![CardType::Creature])
                .with_cost(ManaCost::parse("{1}{G}").unwrap())
                .with_stats(2, 2),
        );
        Arc::new(store)
    }

    fn reconstructor() -> Reconstructor {
        Reconstructor::new(PlayerId::new(1), PlayerId::new(2), knowledge())
    }

    fn event(seq: u64, payload: EventPayload) -> DomainEvent {
        DomainEvent::new(SeqNo::new(seq), Epoch::new(0), payload)
    }

    fn draw_to_local_hand(seq: u64, instance: u32, card: u32) -> DomainEvent {
        event(
            seq,
            EventPayload::ZoneChange(ZoneChange {
                instance: InstanceId::new(instance),
                card: Some(CardId::new(card)),
                from: Some(Zone::Library),
                to: Zone::Hand,
                owner: PlayerId::new(1),
                visible: true,
                position: None,
            }),
        )
    }

    #[test]
    fn test_first_mention_creates_instance() {
        let mut rec = reconstructor();
        let snap = rec.apply(&draw_to_local_hand(1, 50, 2)).unwrap().unwrap();

        let inst = snap.instance(InstanceId::new(50)).unwrap();
        assert_eq!(inst.zone, Zone::Hand);
        assert_eq!(inst.card, Some(CardId::new(2)));
        assert_eq!(snap.us().zones.hand_size(), 1);
        assert!(snap.check_invariants().is_ok());
    }

    #[test]
    fn test_duplicate_event_skipped() {
        let mut rec = reconstructor();
        let ev = draw_to_local_hand(1, 50, 2);

        assert!(rec.apply(&ev).unwrap().is_some());
        assert!(rec.apply(&ev).unwrap().is_none());
        assert_eq!(rec.current().us().zones.hand_size(), 1);
    }

    #[test]
    fn test_new_epoch_reopens_gate() {
        let mut rec = reconstructor();
        assert!(rec.apply(&draw_to_local_hand(1, 50, 2)).unwrap().is_some());

        let mut ev = draw_to_local_hand(1, 51, 2);
        ev.epoch = Epoch::new(1);
        assert!(rec.apply(&ev).unwrap().is_some());
        assert_eq!(rec.current().us().zones.hand_size(), 2);
    }

    #[test]
    fn test_life_absolute_and_delta() {
        let mut rec = reconstructor();
        rec.apply(&event(
            1,
            EventPayload::LifeChange(LifeChange {
                player: PlayerId::new(2),
                value: LifeTotal::Absolute(15),
            }),
        ))
        .unwrap();
        rec.apply(&event(
            2,
            EventPayload::LifeChange(LifeChange {
                player: PlayerId::new(2),
                value: LifeTotal::Delta(-3),
            }),
        ))
        .unwrap();

        assert_eq!(rec.current().them().life, 12);
        assert_eq!(rec.current().us().life, 20);
    }

    #[test]
    fn test_life_unknown_seat_skipped() {
        let mut rec = reconstructor();
        let snap = rec
            .apply(&event(
                1,
                EventPayload::LifeChange(LifeChange {
                    player: PlayerId::new(7),
                    value: LifeTotal::Absolute(1),
                }),
            ))
            .unwrap()
            .unwrap();

        assert_eq!(snap.us().life, 20);
        assert_eq!(snap.them().life, 20);
    }

    #[test]
    fn test_turn_change_resets_active_player_flags_only() {
        let mut rec = reconstructor();
        // Local player plays a land on turn 1
        rec.apply(&draw_to_local_hand(1, 50, 1)).unwrap();
        rec.apply(&event(
            2,
            EventPayload::ZoneChange(ZoneChange {
                instance: InstanceId::new(50),
                card: Some(CardId::new(1)),
                from: Some(Zone::Hand),
                to: Zone::Battlefield,
                owner: PlayerId::new(1),
                visible: true,
                position: None,
            }),
        ))
        .unwrap();
        assert!(rec.current().us().land_drop_used);

        // Opponent's turn: our flag stays, theirs resets
        rec.apply(&event(
            3,
            EventPayload::TurnChange(TurnChange {
                turn: 2,
                active: PlayerId::new(2),
            }),
        ))
        .unwrap();
        assert!(rec.current().us().land_drop_used);
        assert!(!rec.current().them().land_drop_used);

        // Back to us: now ours resets
        rec.apply(&event(
            4,
            EventPayload::TurnChange(TurnChange {
                turn: 3,
                active: PlayerId::new(1),
            }),
        ))
        .unwrap();
        assert!(!rec.current().us().land_drop_used);
    }

    #[test]
    fn test_opponent_hand_is_never_identified() {
        let mut rec = reconstructor();
        let snap = rec
            .apply(&event(
                1,
                EventPayload::ZoneChange(ZoneChange {
                    instance: InstanceId::new(70),
                    card: None,
                    from: Some(Zone::Library),
                    to: Zone::Hand,
                    owner: PlayerId::new(2),
                    visible: false,
                    position: None,
                }),
            ))
            .unwrap()
            .unwrap();

        assert_eq!(snap.them().zones.hand_size(), 1);
        assert!(snap.instance(InstanceId::new(70)).is_none());
        assert_eq!(snap.them().zones.hand[0], HandSlot::Hidden);
    }

    #[test]
    fn test_bounce_to_opponent_hand_stays_revealed() {
        let mut rec = reconstructor();
        // Opponent creature arrives on battlefield (identified)
        rec.apply(&event(
            1,
            EventPayload::ZoneChange(ZoneChange {
                instance: InstanceId::new(70),
                card: Some(CardId::new(2)),
                from: None,
                to: Zone::Battlefield,
                owner: PlayerId::new(2),
                visible: true,
                position: None,
            }),
        ))
        .unwrap();

        // Bounced back to hand: identity is public knowledge
        let snap = rec
            .apply(&event(
                2,
                EventPayload::ZoneChange(ZoneChange {
                    instance: InstanceId::new(70),
                    card: None,
                    from: Some(Zone::Battlefield),
                    to: Zone::Hand,
                    owner: PlayerId::new(2),
                    visible: false,
                    position: None,
                }),
            ))
            .unwrap()
            .unwrap();

        assert_eq!(snap.them().zones.hand[0], HandSlot::Revealed(CardId::new(2)));
        assert!(snap.instance(InstanceId::new(70)).is_none());
        assert!(snap.them().zones.battlefield.is_empty());
    }

    #[test]
    fn test_empty_hand_removal_halts() {
        let mut rec = reconstructor();
        let result = rec.apply(&event(
            1,
            EventPayload::ZoneChange(ZoneChange {
                instance: InstanceId::new(70),
                card: None,
                from: Some(Zone::Hand),
                to: Zone::Graveyard,
                owner: PlayerId::new(2),
                visible: true,
                position: None,
            }),
        ));

        assert!(matches!(
            result,
            Err(InvariantViolation::EmptyZoneRemoval { .. })
        ));
    }

    #[test]
    fn test_library_moves_drop_identity() {
        let mut rec = reconstructor();
        rec.apply(&draw_to_local_hand(1, 50, 2)).unwrap();

        let snap = rec
            .apply(&event(
                2,
                EventPayload::ZoneChange(ZoneChange {
                    instance: InstanceId::new(50),
                    card: Some(CardId::new(2)),
                    from: Some(Zone::Hand),
                    to: Zone::Library,
                    owner: PlayerId::new(1),
                    visible: false,
                    position: None,
                }),
            ))
            .unwrap()
            .unwrap();

        assert!(snap.instance(InstanceId::new(50)).is_none());
        assert_eq!(snap.us().zones.library.count, 1);
        assert_eq!(snap.us().zones.hand_size(), 0);
    }

    #[test]
    fn test_library_explicit_position_keeps_identity() {
        let mut rec = reconstructor();
        rec.apply(&draw_to_local_hand(1, 50, 2)).unwrap();

        let snap = rec
            .apply(&event(
                2,
                EventPayload::ZoneChange(ZoneChange {
                    instance: InstanceId::new(50),
                    card: Some(CardId::new(2)),
                    from: Some(Zone::Hand),
                    to: Zone::Library,
                    owner: PlayerId::new(1),
                    visible: true,
                    position: Some(0),
                }),
            ))
            .unwrap()
            .unwrap();

        assert!(snap.instance(InstanceId::new(50)).is_some());
        assert_eq!(snap.us().zones.library.known_at(0), Some(InstanceId::new(50)));
    }

    #[test]
    fn test_battlefield_entry_marks_summoning_sickness() {
        let mut rec = reconstructor();
        rec.apply(&event(
            1,
            EventPayload::TurnChange(TurnChange {
                turn: 4,
                active: PlayerId::new(1),
            }),
        ))
        .unwrap();
        rec.apply(&draw_to_local_hand(2, 50, 2)).unwrap();
        let snap = rec
            .apply(&event(
                3,
                EventPayload::ZoneChange(ZoneChange {
                    instance: InstanceId::new(50),
                    card: Some(CardId::new(2)),
                    from: Some(Zone::Hand),
                    to: Zone::Battlefield,
                    owner: PlayerId::new(1),
                    visible: true,
                    position: None,
                }),
            ))
            .unwrap()
            .unwrap();

        let inst = snap.instance(InstanceId::new(50)).unwrap();
        assert_eq!(inst.turn_entered, Some(4));
        assert!(inst.summoning_sick(4));
        assert!(!inst.summoning_sick(5));
    }

    #[test]
    fn test_stack_markers_gate_only() {
        let mut rec = reconstructor();
        rec.apply(&event(
            1,
            EventPayload::Stack(StackEvent::Push {
                instance: None,
                card: Some(CardId::new(2)),
            }),
        ))
        .unwrap();
        assert!(!rec.current().stack_empty());
        assert_eq!(
            rec.current().top_of_stack().unwrap().card,
            Some(CardId::new(2))
        );

        rec.apply(&event(2, EventPayload::Stack(StackEvent::Pop)))
            .unwrap();
        assert!(rec.current().stack_empty());

        // Pop on empty is tolerated
        rec.apply(&event(3, EventPayload::Stack(StackEvent::Pop)))
            .unwrap();
        assert!(rec.current().stack_empty());
    }

    #[test]
    fn test_unknown_event_only_bumps_version() {
        let mut rec = reconstructor();
        let before = rec.current();
        let after = rec
            .apply(&event(
                5,
                EventPayload::Unknown {
                    label: "matchGameRoomStateChanged".to_string(),
                },
            ))
            .unwrap()
            .unwrap();

        assert_eq!(after.seq, SeqNo::new(5));
        assert_eq!(after.us(), before.us());
        assert_eq!(after.them(), before.them());
    }

    #[test]
    fn test_pure_fold_is_idempotent() {
        let know = knowledge();
        let base = GameStateSnapshot::new(PlayerId::new(1), PlayerId::new(2));
        let ev = draw_to_local_hand(1, 50, 2);

        let once = apply_event(&base, &ev, &know).unwrap();
        let twice = apply_event(&base, &ev, &know).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resume_from_cursor_skips() {
        let mut rec = reconstructor().resume_from(Epoch::new(0), SeqNo::new(5));
        assert!(rec.apply(&draw_to_local_hand(3, 50, 2)).unwrap().is_none());
        assert!(rec.apply(&draw_to_local_hand(6, 51, 2)).unwrap().is_some());
    }
}
