//! Static card data.
//!
//! `CardData` holds the immutable attributes of a card as shipped in the
//! metadata snapshot: cost, types, power/toughness, and known ability
//! tags. Runtime state (zone, tapped, counters) lives in `CardInstance`.

use serde::{Deserialize, Serialize};

use crate::core::ManaCost;

/// Identifier for a card definition, as used by the game client
/// (the `grpId` in log payloads).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card type as printed on the type line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Planeswalker,
    Land,
}

impl CardType {
    /// Parse a single type word from a type line.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "Creature" => Some(CardType::Creature),
            "Instant" => Some(CardType::Instant),
            "Sorcery" => Some(CardType::Sorcery),
            "Enchantment" => Some(CardType::Enchantment),
            "Artifact" => Some(CardType::Artifact),
            "Planeswalker" => Some(CardType::Planeswalker),
            "Land" => Some(CardType::Land),
            _ => None,
        }
    }
}

/// Behavior tags the advisor is allowed to assume about a card.
///
/// The tag set is deliberately sparse: anything not tagged is treated as
/// "unsupported" and excluded from legality/scoring rather than guessed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityTag {
    /// Destroys, exiles, or damages an opposing permanent.
    Removal,
    /// Can be cast at instant speed despite its card type.
    Flash,
    /// Can attack the turn it enters.
    Haste,
    /// Produces mana.
    ManaSource,
    /// Pump or protection at instant speed.
    CombatTrick,
}

/// Static attributes of one card definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub id: CardId,
    pub name: String,
    pub types: Vec<CardType>,
    /// Parsed cost. `None` for lands and for costs the advisor cannot
    /// reason about (hybrid, X, ...): those are excluded from casting.
    pub cost: Option<ManaCost>,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub tags: Vec<AbilityTag>,
}

impl CardData {
    /// Create a card with a name and types; attributes via builder calls.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, types: Vec<CardType>) -> Self {
        Self {
            id,
            name: name.into(),
            types,
            cost: None,
            power: None,
            toughness: None,
            tags: Vec::new(),
        }
    }

    /// Placeholder for a card absent from the knowledge store.
    ///
    /// No types, no cost, no tags: the evaluator will never select it for
    /// anything beyond counting.
    #[must_use]
    pub fn unknown(id: CardId) -> Self {
        Self::new(id, format!("<unknown {}>", id.raw()), Vec::new())
    }

    /// Set the mana cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Set power/toughness (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    /// Add an ability tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: AbilityTag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Check for a card type.
    #[must_use]
    pub fn has_type(&self, ty: CardType) -> bool {
        self.types.contains(&ty)
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.has_type(CardType::Land)
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.has_type(CardType::Creature)
    }

    /// Check for an ability tag.
    #[must_use]
    pub fn has_tag(&self, tag: AbilityTag) -> bool {
        self.tags.contains(&tag)
    }
}
