//! Legal-action enumeration.
//!
//! Pure function from a snapshot and the card knowledge store to the set
//! of actions the observing player may take right now. The rules model is
//! deliberately partial: anything the store cannot verify — unknown
//! cards, unparseable costs, abilities outside the allowlist — is
//! conservatively excluded rather than guessed at. `PassPriority` is
//! always legal as the fallback.

use smallvec::SmallVec;
use tracing::trace;

use super::action::{ActionDetail, LegalAction};
use super::timing::Speed;
use crate::cards::{AbilityTag, CardData, CardKnowledge, InstanceId};
use crate::core::Step;
use crate::state::{GameStateSnapshot, HandSlot};

/// Enumerate the observing player's legal actions against `snapshot`.
#[must_use]
pub fn legal_actions(snapshot: &GameStateSnapshot, knowledge: &CardKnowledge) -> Vec<LegalAction> {
    let mut actions = Vec::new();
    let version = snapshot.seq;
    let us = snapshot.us();
    let local = snapshot.local;

    let sorcery_ok = Speed::Sorcery.permits(snapshot, local);

    // Hand cards: land drops and casts
    for slot in &us.zones.hand {
        let HandSlot::Held(id) = slot else { continue };
        let Some(inst) = snapshot.instance(*id) else {
            continue;
        };
        let Some(card_id) = inst.card else { continue };
        let Some(data) = knowledge.get(card_id) else {
            // Unknown card: excluded from everything
            continue;
        };

        if data.is_land() {
            if sorcery_ok && !us.land_drop_used {
                actions.push(LegalAction::new(version, ActionDetail::PlayLand { card: *id }));
            }
            continue;
        }

        let Some(cost) = data.cost else {
            trace!(card = card_id.raw(), "cost not payable-checkable, excluded");
            continue;
        };
        if !us.pool.can_pay(&cost) {
            continue;
        }
        if !cast_speed(data).permits(snapshot, local) {
            continue;
        }
        actions.push(LegalAction::new(
            version,
            ActionDetail::CastSpell { card: *id, cost },
        ));
    }

    // Battlefield: allowlisted activated abilities
    for inst in snapshot.battlefield(local) {
        if inst.tapped {
            continue;
        }
        let Some(card_id) = inst.card else { continue };
        for (index, ability) in knowledge.abilities(card_id).iter().enumerate() {
            if !us.pool.can_pay(&ability.cost) {
                continue;
            }
            if !ability.speed.permits(snapshot, local) {
                continue;
            }
            actions.push(LegalAction::new(
                version,
                ActionDetail::ActivateAbility {
                    source: inst.instance,
                    ability: index,
                    cost: ability.cost,
                },
            ));
        }
    }

    // Combat: one declaration covering every eligible attacker
    if snapshot.active == local
        && snapshot.step == Some(Step::DeclareAttackers)
        && snapshot.stack_empty()
    {
        let mut attackers: SmallVec<[InstanceId; 4]> = SmallVec::new();
        let mut total_power = 0;
        for inst in snapshot.battlefield(local) {
            if inst.tapped {
                continue;
            }
            let Some(card_id) = inst.card else { continue };
            let Some(data) = knowledge.get(card_id) else {
                continue;
            };
            if !data.is_creature() {
                continue;
            }
            if inst.summoning_sick(snapshot.turn) && !data.has_tag(AbilityTag::Haste) {
                continue;
            }
            attackers.push(inst.instance);
            total_power += data.power.unwrap_or(0);
        }
        if !attackers.is_empty() {
            actions.push(LegalAction::new(
                version,
                ActionDetail::DeclareAttackers {
                    attackers,
                    total_power,
                },
            ));
        }
    }

    actions.push(LegalAction::new(version, ActionDetail::PassPriority));
    actions
}

/// The speed a card casts at: instants and Flash cards at instant speed,
/// everything else at sorcery speed.
fn cast_speed(data: &CardData) -> Speed {
    if data.has_type(crate::cards::CardType::Instant) || data.has_tag(AbilityTag::Flash) {
        Speed::Instant
    } else {
        Speed::Sorcery
    }
}
