//! Heuristic scoring: signals, weights, and deterministic ranking.

pub mod score;
pub mod signals;

pub use score::{rank, score_action, ScoreWeights, ScoredRecommendation};
