//! Mana model: colors, pools, and costs.
//!
//! ## ManaCost
//!
//! Costs are parsed from the `{2}{R}{R}` symbol notation carried by the
//! card metadata snapshot. Only the symbols the advisor can reason about
//! are accepted: the five colors, `{C}`, and numeric generic symbols.
//! Hybrid, Phyrexian, and X symbols make a cost unparseable, which causes
//! the legality evaluator to conservatively exclude the card rather than
//! guess at payability.
//!
//! ## Payability
//!
//! `ManaPool::can_pay` uses the standard greedy allocation: colored
//! requirements are satisfied first from their own color, then generic is
//! paid from whatever remains (any color or colorless).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The five colors plus colorless.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManaColor {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl ManaColor {
    /// All colors, in the canonical WUBRG + colorless order.
    pub const ALL: [ManaColor; 6] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
        ManaColor::Colorless,
    ];

    /// The single-letter symbol used in cost notation.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            ManaColor::White => 'W',
            ManaColor::Blue => 'U',
            ManaColor::Black => 'B',
            ManaColor::Red => 'R',
            ManaColor::Green => 'G',
            ManaColor::Colorless => 'C',
        }
    }

    /// Parse a single-letter symbol.
    #[must_use]
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'W' => Some(ManaColor::White),
            'U' => Some(ManaColor::Blue),
            'B' => Some(ManaColor::Black),
            'R' => Some(ManaColor::Red),
            'G' => Some(ManaColor::Green),
            'C' => Some(ManaColor::Colorless),
            _ => None,
        }
    }
}

/// Available mana per color at a point in time.
///
/// Amounts come from the log's absolute pool reports; the advisor never
/// simulates mana production itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaPool {
    /// An empty pool.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the amount of a specific color.
    #[must_use]
    pub fn amount(&self, color: ManaColor) -> u8 {
        match color {
            ManaColor::White => self.white,
            ManaColor::Blue => self.blue,
            ManaColor::Black => self.black,
            ManaColor::Red => self.red,
            ManaColor::Green => self.green,
            ManaColor::Colorless => self.colorless,
        }
    }

    /// Set the amount of a specific color.
    pub fn set_amount(&mut self, color: ManaColor, amount: u8) {
        match color {
            ManaColor::White => self.white = amount,
            ManaColor::Blue => self.blue = amount,
            ManaColor::Black => self.black = amount,
            ManaColor::Red => self.red = amount,
            ManaColor::Green => self.green = amount,
            ManaColor::Colorless => self.colorless = amount,
        }
    }

    /// Total mana across all colors.
    #[must_use]
    pub fn total(&self) -> u32 {
        ManaColor::ALL.iter().map(|&c| u32::from(self.amount(c))).sum()
    }

    /// Check whether this pool can pay a cost.
    ///
    /// Colored requirements must be covered by the matching color; generic
    /// is paid from the leftover of any color.
    #[must_use]
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        for &color in &ManaColor::ALL {
            if self.amount(color) < cost.colored(color) {
                return false;
            }
        }
        let leftover = self.total() - cost.colored_total();
        leftover >= u32::from(cost.generic)
    }
}

/// A parsed mana cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
    pub generic: u8,
}

/// A cost symbol the advisor cannot reason about.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported mana symbol {{{symbol}}}")]
pub struct UnsupportedSymbol {
    pub symbol: String,
}

impl ManaCost {
    /// A free cost (e.g. a land).
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// Parse a `{2}{R}{R}`-style cost string.
    ///
    /// An empty string parses as a free cost. Unsupported symbols (hybrid,
    /// Phyrexian, X) produce an error; callers are expected to exclude the
    /// card from consideration rather than approximate.
    pub fn parse(text: &str) -> Result<Self, UnsupportedSymbol> {
        let mut cost = Self::default();
        for symbol in extract_symbols(text) {
            let mut chars = symbol.chars();
            let single = match (chars.next(), chars.next()) {
                (Some(c), None) => ManaColor::from_symbol(c),
                _ => None,
            };
            if let Some(color) = single {
                cost.add_colored(color, 1);
            } else if !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_digit()) {
                let n: u32 = symbol.parse().unwrap_or(0);
                cost.generic = cost.generic.saturating_add(n.min(255) as u8);
            } else {
                return Err(UnsupportedSymbol {
                    symbol: symbol.to_string(),
                });
            }
        }
        Ok(cost)
    }

    /// The colored requirement for one color.
    #[must_use]
    pub fn colored(&self, color: ManaColor) -> u8 {
        match color {
            ManaColor::White => self.white,
            ManaColor::Blue => self.blue,
            ManaColor::Black => self.black,
            ManaColor::Red => self.red,
            ManaColor::Green => self.green,
            ManaColor::Colorless => self.colorless,
        }
    }

    fn add_colored(&mut self, color: ManaColor, n: u8) {
        match color {
            ManaColor::White => self.white += n,
            ManaColor::Blue => self.blue += n,
            ManaColor::Black => self.black += n,
            ManaColor::Red => self.red += n,
            ManaColor::Green => self.green += n,
            ManaColor::Colorless => self.colorless += n,
        }
    }

    /// Sum of all colored requirements.
    #[must_use]
    pub fn colored_total(&self) -> u32 {
        ManaColor::ALL.iter().map(|&c| u32::from(self.colored(c))).sum()
    }

    /// Total converted cost (colored + generic).
    #[must_use]
    pub fn converted(&self) -> u32 {
        self.colored_total() + u32::from(self.generic)
    }
}

/// Split `{2}{R}{R}` into its symbol contents.
fn extract_symbols(text: &str) -> SmallVec<[&str; 6]> {
    let mut out = SmallVec::new();
    let mut rest = text.trim();
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push(&rest[open + 1..open + close]);
        rest = &rest[open + close + 1..];
    }
    out
}
