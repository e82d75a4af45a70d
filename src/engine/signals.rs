//! Independent scoring signals.
//!
//! Each signal inspects one aspect of an action against the snapshot and
//! contributes a bounded value plus a human-readable justification when
//! non-zero. The weighted combination lives in `score`.

use smallvec::SmallVec;

use crate::cards::{AbilityEffect, AbilityTag, CardData, CardKnowledge};
use crate::core::ManaColor;
use crate::rules::{ActionDetail, LegalAction};
use crate::state::GameStateSnapshot;

/// A signal's contribution: raw magnitude and justification.
pub type Contribution = Option<(f64, String)>;

/// Colors an opponent typically holds removal or tricks in.
const REMOVAL_COLORS: [ManaColor; 4] = [
    ManaColor::White,
    ManaColor::Blue,
    ManaColor::Black,
    ManaColor::Red,
];

/// Lethal detection: the action finishes the opponent assuming no blocks
/// or tricks.
pub fn lethal(
    action: &LegalAction,
    snapshot: &GameStateSnapshot,
    knowledge: &CardKnowledge,
) -> Contribution {
    let opp_life = snapshot.them().life;
    if opp_life <= 0 {
        return None;
    }
    match &action.detail {
        ActionDetail::DeclareAttackers { total_power, .. } if *total_power >= opp_life => Some((
            1.0,
            format!("lethal: {total_power} unblocked power vs {opp_life} life"),
        )),
        ActionDetail::ActivateAbility {
            source, ability, ..
        } => {
            let inst = snapshot.instance(*source)?;
            let entry = knowledge.abilities(inst.card?).get(*ability)?;
            match entry.effect {
                AbilityEffect::DealDamage { amount } if amount >= opp_life => Some((
                    1.0,
                    format!("lethal: {amount} damage vs {opp_life} life"),
                )),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Fraction of the available pool this action spends.
#[must_use]
pub fn mana_efficiency_ratio(action: &LegalAction, snapshot: &GameStateSnapshot) -> f64 {
    let available = snapshot.us().pool.total();
    if available == 0 {
        return 0.0;
    }
    f64::from(action.cost().converted()) / f64::from(available)
}

/// Mana efficiency: reward spending a higher fraction of what is open.
pub fn mana_efficiency(action: &LegalAction, snapshot: &GameStateSnapshot) -> Contribution {
    let ratio = mana_efficiency_ratio(action, snapshot);
    if ratio <= 0.0 {
        return None;
    }
    Some((
        ratio.min(1.0),
        format!(
            "spends {} of {} available mana",
            action.cost().converted(),
            snapshot.us().pool.total()
        ),
    ))
}

/// Board presence delta: stats added to the controller's battlefield.
pub fn board_presence(
    action: &LegalAction,
    _snapshot: &GameStateSnapshot,
    knowledge: &CardKnowledge,
) -> Contribution {
    let ActionDetail::CastSpell { card, .. } = &action.detail else {
        return None;
    };
    let data = resolve(_snapshot, knowledge, *card)?;
    if !data.is_creature() {
        return None;
    }
    let stats = data.power.unwrap_or(0) + data.toughness.unwrap_or(0);
    if stats <= 0 {
        return None;
    }
    // A 4/4 saturates the signal
    Some((
        (f64::from(stats) / 8.0).min(1.0),
        format!("adds {} power/toughness to the board", stats),
    ))
}

/// Threat removal: the action can answer the opponent's best creature.
pub fn threat_removal(
    action: &LegalAction,
    snapshot: &GameStateSnapshot,
    knowledge: &CardKnowledge,
) -> Contribution {
    let tagged_removal = match &action.detail {
        ActionDetail::CastSpell { card, .. } => resolve(snapshot, knowledge, *card)
            .is_some_and(|d| d.has_tag(AbilityTag::Removal)),
        ActionDetail::ActivateAbility {
            source, ability, ..
        } => {
            let inst = snapshot.instance(*source);
            inst.and_then(|i| i.card)
                .and_then(|c| knowledge.abilities(c).get(*ability))
                .is_some_and(|a| matches!(a.effect, AbilityEffect::DealDamage { .. }))
        }
        _ => false,
    };
    if !tagged_removal {
        return None;
    }
    let biggest = opponent_best_power(snapshot, knowledge)?;
    // Bigger threats make removal more valuable; a 5-power threat saturates
    Some((
        (f64::from(biggest) / 5.0).min(1.0),
        format!("answers opponent's {biggest}-power threat"),
    ))
}

/// Risk penalty: committing to the board or an attack while the opponent
/// has open mana in removal colors. A proxy, not exact knowledge.
pub fn risk_penalty(
    action: &LegalAction,
    snapshot: &GameStateSnapshot,
    knowledge: &CardKnowledge,
) -> Contribution {
    let committing = match &action.detail {
        ActionDetail::DeclareAttackers { .. } => true,
        ActionDetail::CastSpell { card, .. } => {
            resolve(snapshot, knowledge, *card).is_some_and(|d| d.is_creature())
        }
        _ => false,
    };
    if !committing {
        return None;
    }

    let opp = snapshot.opponent_seat();
    let open: u32 = snapshot
        .battlefield(opp)
        .filter(|inst| !inst.tapped)
        .filter_map(|inst| inst.card)
        .filter_map(|c| knowledge.get(c))
        .filter(|d| d.is_land() && produces_removal_color(d))
        .count() as u32;
    if open < 2 {
        return None;
    }
    Some((
        -(f64::from(open.min(5)) / 5.0),
        format!("opponent has {open} untapped sources in removal colors"),
    ))
}

/// Highest power among the opponent's battlefield creatures.
fn opponent_best_power(snapshot: &GameStateSnapshot, knowledge: &CardKnowledge) -> Option<i32> {
    snapshot
        .battlefield(snapshot.opponent_seat())
        .filter_map(|inst| inst.card)
        .filter_map(|c| knowledge.get(c))
        .filter(|d| d.is_creature())
        .filter_map(|d| d.power)
        .max()
}

/// Colors a land plausibly produces, judged from its name. Unknown lands
/// are assumed able to produce anything — the conservative reading for a
/// risk signal.
fn produces_removal_color(data: &CardData) -> bool {
    let colors = produced_colors(data);
    colors.iter().any(|c| REMOVAL_COLORS.contains(c))
}

fn produced_colors(data: &CardData) -> SmallVec<[ManaColor; 5]> {
    let name = data.name.to_lowercase();
    let mut colors = SmallVec::new();
    for (marker, color) in [
        ("plains", ManaColor::White),
        ("island", ManaColor::Blue),
        ("swamp", ManaColor::Black),
        ("mountain", ManaColor::Red),
        ("forest", ManaColor::Green),
    ] {
        if name.contains(marker) {
            colors.push(color);
        }
    }
    if colors.is_empty() {
        colors.extend([
            ManaColor::White,
            ManaColor::Blue,
            ManaColor::Black,
            ManaColor::Red,
            ManaColor::Green,
        ]);
    }
    colors
}

fn resolve<'a>(
    snapshot: &GameStateSnapshot,
    knowledge: &'a CardKnowledge,
    instance: crate::cards::InstanceId,
) -> Option<&'a CardData> {
    knowledge.get(snapshot.instance(instance)?.card?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardInstance, CardType, InstanceId};
    use crate::core::{ManaCost, PlayerId};
    use crate::events::SeqNo;
    use crate::state::Zone;

    fn snapshot_with_opponent_forest_count(n: u32) -> (GameStateSnapshot, CardKnowledge) {
        let mut snap = GameStateSnapshot::new(PlayerId::new(1), PlayerId::new(2));
        let mut store = CardKnowledge::empty();
        store.register(CardData::new(CardId::new(1), "Swamp", vec![CardType::Land]));
        store.register(
            CardData::new(CardId::new(2), "Grizzly Bears", vec![CardType::Creature])
                .with_cost(ManaCost::parse("{1}{G}").unwrap())
                .with_stats(2, 2),
        );
        for i in 0..n {
            let id = InstanceId::new(100 + i);
            let inst = CardInstance::new(id, Some(CardId::new(1)), PlayerId::new(2), Zone::Battlefield);
            snap.instances.insert(id, inst);
            snap.players
                .get_mut(PlayerId::new(2))
                .unwrap()
                .zones
                .battlefield
                .push_back(id);
        }
        (snap, store)
    }

    #[test]
    fn test_lethal_attack() {
        let (mut snap, store) = snapshot_with_opponent_forest_count(0);
        snap.players.get_mut(PlayerId::new(2)).unwrap().life = 3;

        let action = LegalAction::new(
            SeqNo::new(0),
            ActionDetail::DeclareAttackers {
                attackers: smallvec::smallvec![InstanceId::new(1)],
                total_power: 4,
            },
        );
        let (value, reason) = lethal(&action, &snap, &store).unwrap();
        assert_eq!(value, 1.0);
        assert!(reason.contains("lethal"));
    }

    #[test]
    fn test_not_lethal_when_short() {
        let (mut snap, store) = snapshot_with_opponent_forest_count(0);
        snap.players.get_mut(PlayerId::new(2)).unwrap().life = 5;

        let action = LegalAction::new(
            SeqNo::new(0),
            ActionDetail::DeclareAttackers {
                attackers: smallvec::smallvec![InstanceId::new(1)],
                total_power: 4,
            },
        );
        assert!(lethal(&action, &snap, &store).is_none());
    }

    #[test]
    fn test_mana_efficiency_ratio() {
        let (mut snap, _) = snapshot_with_opponent_forest_count(0);
        snap.players.get_mut(PlayerId::new(1)).unwrap().pool.green = 4;

        let action = LegalAction::new(
            SeqNo::new(0),
            ActionDetail::CastSpell {
                card: InstanceId::new(1),
                cost: ManaCost::parse("{1}{G}").unwrap(),
            },
        );
        assert!((mana_efficiency_ratio(&action, &snap) - 0.5).abs() < 1e-9);

        let pass = LegalAction::new(SeqNo::new(0), ActionDetail::PassPriority);
        assert_eq!(mana_efficiency_ratio(&pass, &snap), 0.0);
    }

    #[test]
    fn test_risk_needs_two_open_sources() {
        let (snap, store) = snapshot_with_opponent_forest_count(1);
        let attack = LegalAction::new(
            SeqNo::new(0),
            ActionDetail::DeclareAttackers {
                attackers: smallvec::smallvec![InstanceId::new(1)],
                total_power: 2,
            },
        );
        assert!(risk_penalty(&attack, &snap, &store).is_none());

        let (snap, store) = snapshot_with_opponent_forest_count(3);
        let (value, reason) = risk_penalty(&attack, &snap, &store).unwrap();
        assert!(value < 0.0);
        assert!(reason.contains("3 untapped"));
    }

    #[test]
    fn test_green_sources_are_not_removal_colors() {
        let mut store = CardKnowledge::empty();
        store.register(CardData::new(CardId::new(9), "Forest", vec![CardType::Land]));
        assert!(!produces_removal_color(store.get(CardId::new(9)).unwrap()));

        store.register(CardData::new(CardId::new(10), "Swamp", vec![CardType::Land]));
        assert!(produces_removal_color(store.get(CardId::new(10)).unwrap()));

        // Unknown land names are conservatively treated as any color
        store.register(CardData::new(CardId::new(11), "Mana Confluence", vec![CardType::Land]));
        assert!(produces_removal_color(store.get(CardId::new(11)).unwrap()));
    }
}
