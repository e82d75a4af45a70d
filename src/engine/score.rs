//! Weighted scoring and deterministic ranking.
//!
//! A score is the weighted sum of the independent signals; every non-zero
//! signal also contributes a justification string. Lethal detection
//! carries a dominant weight so it outranks any combination of the other
//! signals.
//!
//! ## Determinism
//!
//! The ranking is a strict total order. Ties on score fall back to mana
//! efficiency, then the stable `ActionKind` order, then source instance
//! ID, then ability index — two distinct legal actions can never compare
//! equal, so identical inputs always produce identical output order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::signals;
use crate::cards::CardKnowledge;
use crate::rules::{ActionDetail, LegalAction};
use crate::state::GameStateSnapshot;

/// Signal weights. The defaults keep every non-lethal signal's combined
/// reach well below the lethal weight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub lethal: f64,
    pub mana_efficiency: f64,
    pub board_presence: f64,
    pub threat_removal: f64,
    pub risk: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            lethal: 100.0,
            mana_efficiency: 2.0,
            board_presence: 1.5,
            threat_removal: 2.5,
            risk: 1.5,
        }
    }
}

/// A legal action with its score and the reasons behind it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub action: LegalAction,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Score one action.
#[must_use]
pub fn score_action(
    action: &LegalAction,
    snapshot: &GameStateSnapshot,
    knowledge: &CardKnowledge,
    weights: &ScoreWeights,
) -> ScoredRecommendation {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let weighted: [(f64, signals::Contribution); 5] = [
        (weights.lethal, signals::lethal(action, snapshot, knowledge)),
        (weights.mana_efficiency, signals::mana_efficiency(action, snapshot)),
        (
            weights.board_presence,
            signals::board_presence(action, snapshot, knowledge),
        ),
        (
            weights.threat_removal,
            signals::threat_removal(action, snapshot, knowledge),
        ),
        (weights.risk, signals::risk_penalty(action, snapshot, knowledge)),
    ];
    for (weight, contribution) in weighted {
        if let Some((value, reason)) = contribution {
            score += weight * value;
            reasons.push(reason);
        }
    }

    ScoredRecommendation {
        action: action.clone(),
        score,
        reasons,
    }
}

/// Score and rank a legal-action set, best first.
///
/// Ranking also applies the one cross-action signal: passing while
/// spendable mana is open is penalized, so "do nothing" never ties with
/// doing something useful.
#[must_use]
pub fn rank(
    actions: &[LegalAction],
    snapshot: &GameStateSnapshot,
    knowledge: &CardKnowledge,
    weights: &ScoreWeights,
) -> Vec<ScoredRecommendation> {
    let mut scored: Vec<ScoredRecommendation> = actions
        .iter()
        .map(|a| score_action(a, snapshot, knowledge, weights))
        .collect();

    let spendable = actions.iter().any(|a| a.cost().converted() > 0);
    if spendable {
        let open = snapshot.us().pool.total();
        for rec in &mut scored {
            if rec.action.kind() == crate::rules::ActionKind::PassPriority {
                rec.score -= weights.mana_efficiency * 0.5;
                rec.reasons.push(format!("leaves {open} mana unspent"));
            }
        }
    }

    scored.sort_by(|a, b| compare(a, b, snapshot));
    scored
}

/// Strict total order over recommendations, best first.
fn compare(a: &ScoredRecommendation, b: &ScoredRecommendation, snapshot: &GameStateSnapshot) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            let ea = signals::mana_efficiency_ratio(&a.action, snapshot);
            let eb = signals::mana_efficiency_ratio(&b.action, snapshot);
            eb.total_cmp(&ea)
        })
        .then_with(|| a.action.kind().cmp(&b.action.kind()))
        .then_with(|| a.action.source().cmp(&b.action.source()))
        .then_with(|| ability_index(&a.action).cmp(&ability_index(&b.action)))
}

fn ability_index(action: &LegalAction) -> usize {
    match &action.detail {
        ActionDetail::ActivateAbility { ability, .. } => *ability,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, CardId, CardInstance, CardType, InstanceId};
    use crate::core::{ManaCost, Phase, PlayerId};
    use crate::events::SeqNo;
    use crate::rules::ActionKind;
    use crate::state::Zone;

    fn knowledge() -> CardKnowledge {
        let mut store = CardKnowledge::empty();
        store.register(
            CardData::new(CardId::new(2), "Grizzly Bears", vec![CardType::Creature])
                .with_cost(ManaCost::parse("{1}{G}").unwrap())
                .with_stats(2, 2),
        );
        store
    }

    fn snapshot() -> GameStateSnapshot {
        let mut snap = GameStateSnapshot::new(PlayerId::new(1), PlayerId::new(2));
        snap.phase = Phase::FirstMain;
        snap
    }

    fn cast(instance: u32, cost: &str) -> LegalAction {
        LegalAction::new(
            SeqNo::new(0),
            ActionDetail::CastSpell {
                card: InstanceId::new(instance),
                cost: ManaCost::parse(cost).unwrap(),
            },
        )
    }

    #[test]
    fn test_lethal_dominates() {
        let mut snap = snapshot();
        snap.players.get_mut(PlayerId::new(2)).unwrap().life = 3;
        snap.players.get_mut(PlayerId::new(1)).unwrap().pool.green = 5;
        let store = knowledge();

        let attack = LegalAction::new(
            SeqNo::new(0),
            ActionDetail::DeclareAttackers {
                attackers: smallvec::smallvec![InstanceId::new(30)],
                total_power: 4,
            },
        );
        let actions = vec![cast(10, "{1}{G}"), attack, LegalAction::new(SeqNo::new(0), ActionDetail::PassPriority)];

        let ranked = rank(&actions, &snap, &store, &ScoreWeights::default());
        assert_eq!(ranked[0].action.kind(), ActionKind::DeclareAttackers);
        assert!(ranked[0].score > ranked[1].score + 50.0);
        assert!(ranked[0].reasons.iter().any(|r| r.contains("lethal")));
    }

    #[test]
    fn test_higher_spend_ranks_first() {
        let mut snap = snapshot();
        snap.players.get_mut(PlayerId::new(1)).unwrap().pool.green = 3;
        let store = knowledge();

        let actions = vec![cast(10, "{G}"), cast(11, "{2}{G}")];
        let ranked = rank(&actions, &snap, &store, &ScoreWeights::default());

        assert_eq!(ranked[0].action.source(), Some(InstanceId::new(11)));
        assert_eq!(ranked[1].action.source(), Some(InstanceId::new(10)));
    }

    #[test]
    fn test_strict_total_order() {
        let mut snap = snapshot();
        snap.players.get_mut(PlayerId::new(1)).unwrap().pool.green = 4;
        let store = knowledge();

        // Identical costs tie on every signal; the kind/instance
        // tie-break must still separate them deterministically
        let actions = vec![
            cast(11, "{G}"),
            cast(10, "{G}"),
            LegalAction::new(SeqNo::new(0), ActionDetail::PassPriority),
        ];
        let first = rank(&actions, &snap, &store, &ScoreWeights::default());
        let second = rank(&actions, &snap, &store, &ScoreWeights::default());

        let order: Vec<_> = first.iter().map(|r| r.action.source()).collect();
        assert_eq!(order, vec![Some(InstanceId::new(10)), Some(InstanceId::new(11)), None]);
        let again: Vec<_> = second.iter().map(|r| r.action.source()).collect();
        assert_eq!(order, again);
    }

    #[test]
    fn test_pass_priority_scores_zero() {
        let snap = snapshot();
        let store = knowledge();
        let pass = LegalAction::new(SeqNo::new(0), ActionDetail::PassPriority);

        let scored = score_action(&pass, &snap, &store, &ScoreWeights::default());
        assert_eq!(scored.score, 0.0);
        assert!(scored.reasons.is_empty());
    }

    #[test]
    fn test_board_presence_rewards_creatures() {
        let mut snap = snapshot();
        snap.players.get_mut(PlayerId::new(1)).unwrap().pool.green = 2;
        let store = knowledge();

        // The instance table must resolve the hand card for the signal
        let id = InstanceId::new(10);
        snap.instances.insert(
            id,
            CardInstance::new(id, Some(CardId::new(2)), PlayerId::new(1), Zone::Hand),
        );

        let scored = score_action(&cast(10, "{1}{G}"), &snap, &store, &ScoreWeights::default());
        assert!(scored.reasons.iter().any(|r| r.contains("power/toughness")));
    }
}
