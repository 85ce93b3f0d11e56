//! Various helpers when manipulating set cards
//!
//! A card is stored as its index in the deck (0..80). The base-3 digits of the
//! index are the values of the 4 attributes, most significant digit first:
//!     index = color * 27 + shape * 9 + fill * 3 + count
//!
//! With this encoding, three cards form a valid set exactly when, for every
//! attribute, the sum of their 3 digits is a multiple of 3. The card which
//! completes a pair is therefore obtained digit by digit.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

pub const NB_ATTRIBUTES: usize = 4;
pub const NB_VALUES: usize = 3;
pub const DECK_SIZE: usize = 81;

/// Largest number of cards which can be laid out without any set.
pub const MAX_NO_SET_SIZE: usize = 20;

/// One of the 4 dimensions of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Color,
    Shape,
    Fill,
    Count,
}

impl Attribute {
    pub const ALL: [Attribute; NB_ATTRIBUTES] = [
        Attribute::Color,
        Attribute::Shape,
        Attribute::Fill,
        Attribute::Count,
    ];

    /// Rank of the attribute's digit in the base-3 card index (0 = most
    /// significant)
    pub fn index(self) -> usize {
        match self {
            Attribute::Color => 0,
            Attribute::Shape => 1,
            Attribute::Fill => 2,
            Attribute::Count => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Color => "color",
            Attribute::Shape => "shape",
            Attribute::Fill => "fill",
            Attribute::Count => "count",
        }
    }

    /// Symbolic names of the 3 values, in the order used by the completion
    /// rule
    pub fn value_names(self) -> [&'static str; NB_VALUES] {
        match self {
            Attribute::Color => ["red", "green", "blue"],
            Attribute::Shape => ["wave", "circle", "square"],
            Attribute::Fill => ["strips", "flood", "none"],
            Attribute::Count => ["1", "2", "3"],
        }
    }

    /// Value (0..2) matching a symbolic name, if any
    pub fn value_of(self, name: &str) -> Option<u8> {
        self.value_names()
            .iter()
            .position(|&n| n == name)
            .map(|v| v as u8)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the value which completes `a` and `b` into a valid set on one
/// attribute: `a` itself if both are equal, the missing one otherwise.
pub fn third(a: u8, b: u8) -> u8 {
    debug_assert!(a < 3 && b < 3, "attribute values are 0, 1 or 2");
    (6 - a - b) % 3
}

/// A card of the deck, identified by its index (0..80)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    pub fn from_index(index: usize) -> Option<Card> {
        if index < DECK_SIZE {
            Some(Card(index as u8))
        } else {
            None
        }
    }

    /// Builds a card from its 4 attribute values (each in 0..2)
    pub fn from_values(values: [u8; NB_ATTRIBUTES]) -> Option<Card> {
        let mut index = 0usize;
        for v in values {
            if v as usize >= NB_VALUES {
                return None;
            }
            index = index * 3 + v as usize;
        }
        Some(Card(index as u8))
    }

    /// Builds a card from its value names, in attribute order
    /// (e.g. `["red", "wave", "strips", "1"]`)
    pub fn from_names(names: [&str; NB_ATTRIBUTES]) -> Option<Card> {
        let mut values = [0u8; NB_ATTRIBUTES];
        for (attr, name) in Attribute::ALL.iter().zip(names) {
            values[attr.index()] = attr.value_of(name)?;
        }
        Card::from_values(values)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts the card index to its base-3 representation, i.e. the values
    /// of its 4 attributes
    pub fn values(self) -> [u8; NB_ATTRIBUTES] {
        let mut rem = self.0;
        let mut base3 = [0; NB_ATTRIBUTES];
        for j in (0..NB_ATTRIBUTES).rev() {
            base3[j] = rem % 3;
            rem /= 3;
        }
        base3
    }

    pub fn value(self, attr: Attribute) -> u8 {
        self.values()[attr.index()]
    }

    /// Same card with one attribute changed
    pub fn with_value(self, attr: Attribute, value: u8) -> Card {
        let mut values = self.values();
        values[attr.index()] = value % 3;
        // all digits are in range: cannot fail
        Card::from_values(values).unwrap_or(self)
    }

    pub fn names(self) -> [&'static str; NB_ATTRIBUTES] {
        let values = self.values();
        Attribute::ALL.map(|attr| attr.value_names()[values[attr.index()] as usize])
    }
}

impl TryFrom<u8> for Card {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Card::from_index(index as usize).ok_or_else(|| format!("card index {} out of deck", index))
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [color, shape, fill, count] = self.names();
        write!(f, "({}, {}, {}, {})", color, shape, fill, count)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card#{:02}{}", self.0, self)
    }
}

// The whole deck, enumerated once
static DECK: LazyLock<[Card; DECK_SIZE]> = LazyLock::new(|| std::array::from_fn(|i| Card(i as u8)));

// COMPLETION_TABLE[a][b] is the card completing (a, b) into a set
static COMPLETION_TABLE: LazyLock<Vec<[Card; DECK_SIZE]>> = LazyLock::new(|| {
    (0..DECK_SIZE)
        .map(|a| {
            let va = Card(a as u8).values();
            std::array::from_fn(|b| {
                let vb = Card(b as u8).values();
                let mut vc = [0u8; NB_ATTRIBUTES];
                for j in 0..NB_ATTRIBUTES {
                    vc[j] = third(va[j], vb[j]);
                }
                Card::from_values(vc).unwrap_or(Card(a as u8))
            })
        })
        .collect()
});

/// Returns all 81 cards, in index order
pub fn deck() -> &'static [Card; DECK_SIZE] {
    &DECK
}

/// Returns the unique card which forms a valid set with `a` and `b`
///
/// For `a == b` this is `a` itself; for distinct cards it differs from both.
#[inline]
pub fn complete(a: Card, b: Card) -> Card {
    COMPLETION_TABLE[a.index()][b.index()]
}

/// Number of attributes on which two cards share the same value
pub fn count_same(a: Card, b: Card) -> usize {
    let va = a.values();
    let vb = b.values();
    va.iter().zip(vb.iter()).filter(|(x, y)| x == y).count()
}

/// Checks whether 3 distinct cards form a valid set
///
/// # Panics
/// Panics if two of the cards are identical.
pub fn is_set(c0: Card, c1: Card, c2: Card) -> bool {
    assert!(
        c0 != c1 && c0 != c2 && c1 != c2,
        "is_set: duplicate cards in triple {:?} {:?} {:?}",
        c0,
        c1,
        c2
    );
    let base3 = [c0.values(), c1.values(), c2.values()];
    // sum each attribute (= digit of same rank) across the 3 cards
    let mut sum_base3 = [0u8; NB_ATTRIBUTES];
    for b3 in base3.iter() {
        for j in 0..NB_ATTRIBUTES {
            sum_base3[j] += b3[j];
        }
    }
    // For each attribute, the sum modulo 3 must be 0 for a valid SET
    sum_base3.iter().all(|s| s % 3 == 0)
}

/// Same as `is_set`, for a slice which must hold exactly 3 cards
///
/// # Panics
/// Panics if the slice does not hold exactly 3 distinct cards.
pub fn is_set_slice(cards: &[Card]) -> bool {
    match cards {
        [c0, c1, c2] => is_set(*c0, *c1, *c2),
        _ => panic!("is_set_slice: expected 3 cards, got {}", cards.len()),
    }
}

/// Goes through all triplets of cards and lists the ones forming a set
pub fn find_sets(cards: &[Card]) -> Vec<[Card; 3]> {
    let n = cards.len();
    let mut sets = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if is_set(cards[i], cards[j], cards[k]) {
                    sets.push([cards[i], cards[j], cards[k]]);
                }
            }
        }
    }
    sets
}

/// Counts the triplets of cards forming a set (cards must be distinct)
pub fn count_sets(cards: &[Card]) -> usize {
    let n = cards.len();
    let mut count = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                if is_set(cards[i], cards[j], cards[k]) {
                    count += 1;
                }
            }
        }
    }
    count
}
