//! Turn structure: phases and steps.
//!
//! Parsed from the vendor tokens the log uses (`Phase_Main1`,
//! `Step_DeclareAttack`, ...). Tokens the advisor does not recognize map
//! to `None` at the normalizer, which leaves the previous phase in place
//! rather than corrupting the reconstruction.

use serde::{Deserialize, Serialize};

/// Top-level phase of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    FirstMain,
    Combat,
    SecondMain,
    Ending,
}

impl Phase {
    /// Parse a vendor phase token.
    #[must_use]
    pub fn from_log_token(token: &str) -> Option<Self> {
        match token {
            "Phase_Beginning" => Some(Phase::Beginning),
            "Phase_Main1" => Some(Phase::FirstMain),
            "Phase_Combat" => Some(Phase::Combat),
            "Phase_Main2" => Some(Phase::SecondMain),
            "Phase_Ending" => Some(Phase::Ending),
            _ => None,
        }
    }

    /// Whether this is one of the two main phases.
    #[must_use]
    pub fn is_main(self) -> bool {
        matches!(self, Phase::FirstMain | Phase::SecondMain)
    }
}

/// Step within a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    Untap,
    Upkeep,
    Draw,
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,
    EndStep,
    Cleanup,
}

impl Step {
    /// Parse a vendor step token.
    #[must_use]
    pub fn from_log_token(token: &str) -> Option<Self> {
        match token {
            "Step_Untap" => Some(Step::Untap),
            "Step_Upkeep" => Some(Step::Upkeep),
            "Step_Draw" => Some(Step::Draw),
            "Step_BeginCombat" => Some(Step::BeginCombat),
            "Step_DeclareAttack" => Some(Step::DeclareAttackers),
            "Step_DeclareBlock" => Some(Step::DeclareBlockers),
            "Step_CombatDamage" => Some(Step::CombatDamage),
            "Step_EndCombat" => Some(Step::EndCombat),
            "Step_End" => Some(Step::EndStep),
            "Step_Cleanup" => Some(Step::Cleanup),
            _ => None,
        }
    }
}
