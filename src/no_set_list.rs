//! Greedy construction of a no-set-list, i.e. a combination of cards within
//! which no valid set can be found.
//!
//! The construction alternates two phases:
//!     - grow: among the cards which can still be added without creating a
//!       set, add one which forbids as few further cards as possible
//!     - repair: when no card can be added, remove the cards whose removal
//!       frees as many cards as possible, then grow again
//! An attempt which does not reach the target size within `max_steps` is
//! dropped and the construction restarts from an empty table.

use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::card_set::CardSet;
use crate::error::{PuzzleError, Result};
use crate::set::{Card, MAX_NO_SET_SIZE, complete};

/// Cards which would create a set with some pair of `cards`
pub fn forbidden_completions(cards: &CardSet) -> CardSet {
    let list = cards.to_vec();
    let mut forbidden = CardSet::new();
    for (i, &a) in list.iter().enumerate() {
        for &b in &list[i + 1..] {
            forbidden.insert(complete(a, b));
        }
    }
    forbidden
}

/// The working table of the construction, with its forbidden cards cached
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSetList {
    no_set_list: CardSet,
    forbidden: CardSet,
}

impl NoSetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a no-set-list from arbitrary cards (duplicates are merged)
    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Self {
        let no_set_list: CardSet = cards.into_iter().collect();
        Self {
            no_set_list,
            forbidden: forbidden_completions(&no_set_list),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.no_set_list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.no_set_list.is_empty()
    }

    pub fn card_set(&self) -> &CardSet {
        &self.no_set_list
    }

    /// Cards of the table, in increasing index order
    pub fn cards(&self) -> Vec<Card> {
        self.no_set_list.to_vec()
    }

    pub fn forbidden(&self) -> &CardSet {
        &self.forbidden
    }

    /// Cards which can be added without creating a set
    pub fn remaining(&self) -> CardSet {
        CardSet::full()
            .difference(&self.no_set_list)
            .difference(&self.forbidden)
    }

    /// Adds a card and extends the forbidden cards with its completions
    pub fn insert(&mut self, card: Card) {
        debug_assert!(!self.forbidden.contains(card), "{:?} would create a set", card);
        self.forbidden = self.forbidden_with(card);
        self.no_set_list.insert(card);
    }

    /// Removes a card; the forbidden cards are recomputed from scratch
    pub fn remove(&mut self, card: Card) {
        if self.no_set_list.remove(card) {
            self.forbidden = forbidden_completions(&self.no_set_list);
        }
    }

    fn forbidden_with(&self, card: Card) -> CardSet {
        let mut forbidden = self.forbidden;
        for other in self.no_set_list.iter() {
            if other != card {
                forbidden.insert(complete(card, other));
            }
        }
        forbidden
    }

    /// Scores every card which can be added by the number of forbidden cards
    /// once it is added
    pub fn score_additions(&self) -> Vec<(Card, usize)> {
        self.remaining()
            .iter()
            .map(|c| (c, self.forbidden_with(c).len()))
            .collect()
    }

    /// Scores every card of the table by the number of forbidden cards once
    /// it is removed
    pub fn score_removals(&self) -> Vec<(Card, usize)> {
        self.no_set_list
            .iter()
            .map(|c| {
                let mut without = self.no_set_list;
                without.remove(c);
                (c, forbidden_completions(&without).len())
            })
            .collect()
    }
}

impl fmt::Display for NoSetList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nsl: Vec<String> = self.no_set_list.iter().map(|c| format!("{:>2}", c.index())).collect();
        write!(
            f,
            "{:>2}-list: forbidden={:>2} : ({})",
            self.len(),
            self.forbidden.len(),
            nsl.join(".")
        )
    }
}

impl fmt::Debug for NoSetList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Picks uniformly at random one of the cards with the lowest score
pub fn select_top_and_choice<R: Rng + ?Sized>(scored: &[(Card, usize)], rng: &mut R) -> Option<Card> {
    let best = scored.iter().map(|&(_, score)| score).min()?;
    let top: Vec<Card> = scored
        .iter()
        .filter(|&&(_, score)| score == best)
        .map(|&(card, _)| card)
        .collect();
    top.choose(rng).copied()
}

/// Bounds of the construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructionLimits {
    /// Number of cards to reach
    pub target_size: usize,
    /// Grow/repair steps allowed per attempt
    pub max_steps: usize,
    /// Cards removed by one repair step
    pub max_removals: usize,
    /// Attempts discarded before giving up (`None`: never give up)
    pub max_restarts: Option<u64>,
}

impl Default for ConstructionLimits {
    fn default() -> Self {
        Self {
            target_size: MAX_NO_SET_SIZE,
            max_steps: 100,
            max_removals: 2,
            max_restarts: Some(10_000),
        }
    }
}

/// One bounded grow/repair run from an empty table. Returns the table if it
/// reached the target size.
fn attempt<R: Rng + ?Sized>(limits: &ConstructionLimits, rng: &mut R) -> Option<NoSetList> {
    let mut nsl = NoSetList::new();
    let mut step = 0;
    while nsl.len() < limits.target_size && step < limits.max_steps {
        step += 1;
        let to_add = nsl.score_additions();
        if let Some(card) = select_top_and_choice(&to_add, rng) {
            nsl.insert(card);
            continue;
        }
        // dead-end: free some room
        for _ in 0..limits.max_removals {
            let to_del = nsl.score_removals();
            match select_top_and_choice(&to_del, rng) {
                Some(card) => nsl.remove(card),
                None => break,
            }
        }
        debug!("repair at step {}: back to {}", step, nsl);
    }
    if nsl.len() >= limits.target_size {
        Some(nsl)
    } else {
        None
    }
}

/// Builds a combination of `limits.target_size` cards holding no set
///
/// Attempts are repeated from scratch until one succeeds, or until
/// `limits.max_restarts` attempts have been discarded.
pub fn construct_no_set_subset<R: Rng + ?Sized>(limits: &ConstructionLimits, rng: &mut R) -> Result<NoSetList> {
    if limits.target_size > MAX_NO_SET_SIZE {
        return Err(PuzzleError::TargetTooLarge {
            requested: limits.target_size,
            max: MAX_NO_SET_SIZE,
        });
    }
    let mut restarts: u64 = 0;
    loop {
        if let Some(nsl) = attempt(limits, rng) {
            info!("found a {}-card no-set-list after {} restarts", nsl.len(), restarts);
            return Ok(nsl);
        }
        if limits.max_restarts.is_some_and(|max| restarts >= max) {
            return Err(PuzzleError::ConstructionExhausted { restarts });
        }
        restarts += 1;
        debug!("attempt failed, restarting ({} so far)", restarts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::{count_sets, deck};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn card(names: [&str; 4]) -> Card {
        Card::from_names(names).expect("valid card names")
    }

    #[test]
    fn test_forbidden_completions_of_a_pair() {
        let a = card(["red", "wave", "strips", "1"]);
        let b = card(["red", "circle", "flood", "2"]);
        let nsl = NoSetList::from_cards([a, b]);
        assert_eq!(nsl.forbidden().to_vec(), vec![card(["red", "square", "none", "3"])]);
        assert_eq!(nsl.remaining().len(), 78);
    }

    #[test]
    fn test_insert_matches_recompute() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut nsl = NoSetList::new();
        for _ in 0..12 {
            let to_add = nsl.score_additions();
            let c = select_top_and_choice(&to_add, &mut rng).expect("room left");
            nsl.insert(c);
            assert_eq!(*nsl.forbidden(), forbidden_completions(nsl.card_set()));
            assert_eq!(count_sets(&nsl.cards()), 0);
        }
        let victim = nsl.cards()[3];
        nsl.remove(victim);
        assert_eq!(nsl.len(), 11);
        assert_eq!(*nsl.forbidden(), forbidden_completions(nsl.card_set()));
    }

    #[test]
    fn test_scores() {
        let nsl = NoSetList::from_cards(deck()[0..2].iter().copied());
        // any third card forbids 2 new cards
        let additions = nsl.score_additions();
        assert_eq!(additions.len(), 78);
        assert!(additions.iter().all(|&(_, s)| s == 3));
        let removals = nsl.score_removals();
        assert_eq!(removals, vec![(deck()[0], 0), (deck()[1], 0)]);
    }

    #[test]
    fn test_select_top_and_choice() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(select_top_and_choice(&[], &mut rng), None);
        let scored = vec![(deck()[0], 5), (deck()[1], 2), (deck()[2], 2), (deck()[3], 9)];
        for _ in 0..50 {
            let c = select_top_and_choice(&scored, &mut rng).expect("non empty");
            assert!(c == deck()[1] || c == deck()[2]);
        }
    }

    #[test]
    fn test_construct_reaches_20_without_set() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let nsl = construct_no_set_subset(&ConstructionLimits::default(), &mut rng).expect("construction");
        assert_eq!(nsl.len(), 20);
        assert_eq!(count_sets(&nsl.cards()), 0);
        assert!(nsl.remaining().is_empty());
    }

    #[test]
    fn test_construct_is_reproducible() {
        let limits = ConstructionLimits::default();
        let a = construct_no_set_subset(&limits, &mut ChaCha8Rng::seed_from_u64(99)).expect("a");
        let b = construct_no_set_subset(&limits, &mut ChaCha8Rng::seed_from_u64(99)).expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn test_construct_rejects_oversized_target() {
        let limits = ConstructionLimits {
            target_size: 21,
            ..ConstructionLimits::default()
        };
        let err = construct_no_set_subset(&limits, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, PuzzleError::TargetTooLarge { requested: 21, max: 20 }));
    }

    #[test]
    fn test_construct_exhausts_restarts() {
        // 3 steps can never place 20 cards
        let limits = ConstructionLimits {
            max_steps: 3,
            max_restarts: Some(4),
            ..ConstructionLimits::default()
        };
        let err = construct_no_set_subset(&limits, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, PuzzleError::ConstructionExhausted { restarts: 4 }));
    }

    #[test]
    fn test_small_target_needs_no_repair() {
        let limits = ConstructionLimits {
            target_size: 9,
            max_restarts: Some(0),
            ..ConstructionLimits::default()
        };
        let nsl = construct_no_set_subset(&limits, &mut ChaCha8Rng::seed_from_u64(3)).expect("9 cards");
        assert_eq!(nsl.len(), 9);
        assert_eq!(count_sets(&nsl.cards()), 0);
    }
}
