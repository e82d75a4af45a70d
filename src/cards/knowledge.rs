//! Card knowledge store: static metadata lookup.
//!
//! Loaded once at startup from a JSON snapshot produced by the external
//! data-acquisition step, then treated as read-only for the process
//! lifetime. A lookup miss degrades gracefully: the caller gets an inert
//! `CardData` with no types, no cost, and no tags, so the evaluator
//! excludes the card from everything rather than guessing.
//!
//! ## Activated ability allowlist
//!
//! Ability knowledge is open-ended, so it is modeled as a sparse allowlist
//! keyed by card ID. A card with no allowlist entry simply has no
//! activatable abilities as far as the advisor is concerned. This boundary
//! is deliberate scope control.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::card::{AbilityTag, CardData, CardId, CardType};
use crate::core::ManaCost;
use crate::error::{KnowledgeError, UnknownCardError};
use crate::rules::Speed;

/// What an allowlisted ability does, at the granularity scoring needs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Deals `amount` damage to any target.
    DealDamage { amount: i32 },
    /// Controller gains `amount` life.
    GainLife { amount: i32 },
    /// Draws a card.
    DrawCard,
}

/// One activated ability on the allowlist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub cost: ManaCost,
    pub speed: Speed,
    pub effect: AbilityEffect,
}

/// One record in the metadata snapshot file.
#[derive(Debug, Deserialize)]
struct CardRecord {
    arena_id: u32,
    name: String,
    #[serde(default)]
    mana_cost: String,
    #[serde(default)]
    type_line: String,
    #[serde(default)]
    power: Option<i32>,
    #[serde(default)]
    toughness: Option<i32>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    abilities: Vec<ActivatedAbility>,
}

/// Read-only lookup from card ID to static attributes.
#[derive(Clone, Debug, Default)]
pub struct CardKnowledge {
    cards: FxHashMap<CardId, CardData>,
    abilities: FxHashMap<CardId, Vec<ActivatedAbility>>,
}

impl CardKnowledge {
    /// Create an empty store (every lookup misses).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the store from a JSON snapshot file.
    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let text = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&text)?;
        info!(cards = store.len(), path = %path.display(), "card knowledge loaded");
        Ok(store)
    }

    /// Parse the store from JSON text.
    pub fn from_json(text: &str) -> Result<Self, KnowledgeError> {
        let records: Vec<CardRecord> = serde_json::from_str(text)?;
        let mut store = Self::default();
        for record in records {
            let id = CardId::new(record.arena_id);
            let types = record
                .type_line
                .split_whitespace()
                .filter_map(CardType::from_word)
                .collect();
            let mut card = CardData::new(id, record.name, types);
            // Costless entries and unparseable costs stay None; such
            // cards are never considered castable
            if !record.mana_cost.is_empty() {
                if let Ok(cost) = ManaCost::parse(&record.mana_cost) {
                    card.cost = Some(cost);
                }
            }
            card.power = record.power;
            card.toughness = record.toughness;
            for keyword in &record.keywords {
                if let Some(tag) = tag_from_keyword(keyword) {
                    card = card.with_tag(tag);
                }
            }
            if !record.abilities.is_empty() {
                store.abilities.insert(id, record.abilities);
            }
            store.cards.insert(id, card);
        }
        Ok(store)
    }

    /// Register a card directly. Used by tests and by games with
    /// hand-curated knowledge.
    pub fn register(&mut self, card: CardData) {
        self.cards.insert(card.id, card);
    }

    /// Register an allowlisted ability for a card.
    pub fn register_ability(&mut self, id: CardId, ability: ActivatedAbility) {
        self.abilities.entry(id).or_default().push(ability);
    }

    /// Look up a card, `None` on miss.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardData> {
        let found = self.cards.get(&id);
        if found.is_none() {
            debug!(card = id.raw(), "card knowledge miss, treating as unknown");
        }
        found
    }

    /// Look up a card, degrading to an inert placeholder on miss.
    #[must_use]
    pub fn get_or_unknown(&self, id: CardId) -> CardData {
        self.get(id).cloned().unwrap_or_else(|| CardData::unknown(id))
    }

    /// Look up a card, surfacing the miss as an error for callers that
    /// want to report degradation instead of silently proceeding.
    pub fn require(&self, id: CardId) -> Result<&CardData, UnknownCardError> {
        self.cards.get(&id).ok_or(UnknownCardError { card: id })
    }

    /// Allowlisted activated abilities for a card. Empty on miss.
    #[must_use]
    pub fn abilities(&self, id: CardId) -> &[ActivatedAbility] {
        self.abilities.get(&id).map_or(&[], |v| v.as_slice())
    }

    /// Number of known cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

fn tag_from_keyword(keyword: &str) -> Option<AbilityTag> {
    match keyword {
        "Removal" => Some(AbilityTag::Removal),
        "Flash" => Some(AbilityTag::Flash),
        "Haste" => Some(AbilityTag::Haste),
        "ManaSource" => Some(AbilityTag::ManaSource),
        "CombatTrick" => Some(AbilityTag::CombatTrick),
        _ => None,
    }
}
