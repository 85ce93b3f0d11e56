//! A set of cards of the deck, packed in a 128-bit mask (bit i = card i)
//!
//! The deck holds 81 cards, so a single u128 is enough: insertion, removal,
//! membership and size are all O(1), and the whole set is `Copy`.

use std::fmt;

use crate::set::{Card, DECK_SIZE};

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CardSet(u128);

impl CardSet {
    const FULL_MASK: u128 = (1u128 << DECK_SIZE) - 1;

    pub const fn new() -> Self {
        CardSet(0)
    }

    /// The whole deck
    pub const fn full() -> Self {
        CardSet(Self::FULL_MASK)
    }

    /// Adds a card, returns true if it was not already present
    pub fn insert(&mut self, card: Card) -> bool {
        let bit = 1u128 << card.index();
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    /// Removes a card, returns true if it was present
    pub fn remove(&mut self, card: Card) -> bool {
        let bit = 1u128 << card.index();
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    #[inline]
    pub fn contains(&self, card: Card) -> bool {
        self.0 & (1u128 << card.index()) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn union(&self, other: &CardSet) -> CardSet {
        CardSet(self.0 | other.0)
    }

    pub fn difference(&self, other: &CardSet) -> CardSet {
        CardSet(self.0 & !other.0)
    }

    pub fn intersection(&self, other: &CardSet) -> CardSet {
        CardSet(self.0 & other.0)
    }

    /// Cards of the set, in increasing index order
    pub fn iter(&self) -> CardSetIter {
        CardSetIter(self.0)
    }

    pub fn to_vec(&self) -> Vec<Card> {
        self.iter().collect()
    }
}

pub struct CardSetIter(u128);

impl Iterator for CardSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        // clear lowest bit
        self.0 &= self.0 - 1;
        Card::from_index(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut set = CardSet::new();
        for card in iter {
            set.insert(card);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CardSet {
    type Item = Card;
    type IntoIter = CardSetIter;

    fn into_iter(self) -> CardSetIter {
        self.iter()
    }
}

impl fmt::Debug for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.index())).finish()
    }
}
