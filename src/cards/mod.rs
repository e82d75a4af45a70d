//! Card system: static data, runtime instances, and the knowledge store.
//!
//! ## Key Types
//!
//! - `CardId`: vendor identifier for a card definition
//! - `CardData`: static attributes (cost, types, stats, tags)
//! - `InstanceId` / `CardInstance`: one physical occurrence during a match
//! - `CardKnowledge`: read-only lookup, loaded once at startup
//!
//! Missing knowledge never fails a pipeline run: lookups degrade to an
//! inert placeholder and the card is excluded from recommendations.

pub mod card;
pub mod instance;
pub mod knowledge;

pub use card::{AbilityTag, CardData, CardId, CardType};
pub use instance::{CardInstance, InstanceId};
pub use knowledge::{AbilityEffect, ActivatedAbility, CardKnowledge};
