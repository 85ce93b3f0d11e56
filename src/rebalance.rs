//! Relabeling of one attribute by frequency rank
//!
//! Solid shapes draw the eye more than striped ones, and striped ones more
//! than outlines. After construction the fill values are renamed so that the
//! least frequent fill is drawn solid and the most frequent one as an outline,
//! so the most dominant style is the rarest on the table rather than ordering
//! fills by frequency in their plain value order.
//!
//! Renaming the values of one attribute through a permutation of {0, 1, 2}
//! maps three equal values to three equal values and three distinct values to
//! three distinct values, so it maps sets to sets and non-sets to non-sets:
//! a set-free table stays set-free and its cards stay distinct.

use crate::error::{PuzzleError, Result};
use crate::set::{Attribute, Card, NB_VALUES};

/// Fill value given to the least, middle and most frequent fill: flood,
/// strips, none
pub const FILL_TARGET_BY_RANK: [u8; NB_VALUES] = [1, 0, 2];

/// Number of cards holding each value of `attr`
pub fn value_counts(cards: &[Card], attr: Attribute) -> [usize; NB_VALUES] {
    let mut counts = [0; NB_VALUES];
    for card in cards {
        counts[card.value(attr) as usize] += 1;
    }
    counts
}

/// Values sorted by ascending count, ties kept in value order
pub fn rank_values(counts: &[usize; NB_VALUES]) -> [u8; NB_VALUES] {
    let mut ranked = [0u8, 1, 2];
    ranked.sort_by_key(|&v| counts[v as usize]);
    ranked
}

/// Renames the values of `attr`: the value of rank r (by ascending frequency)
/// becomes `target_by_rank[r]`
pub fn rebalance_attribute(
    cards: &[Card],
    attr: Attribute,
    target_by_rank: [u8; NB_VALUES],
) -> Result<Vec<Card>> {
    let mut sorted = target_by_rank;
    sorted.sort_unstable();
    if sorted != [0, 1, 2] {
        return Err(PuzzleError::Config(format!(
            "{:?} is not a permutation of the {} values",
            target_by_rank, attr
        )));
    }
    Ok(relabel_by_rank(cards, attr, target_by_rank))
}

fn relabel_by_rank(cards: &[Card], attr: Attribute, target_by_rank: [u8; NB_VALUES]) -> Vec<Card> {
    let ranked = rank_values(&value_counts(cards, attr));
    let mut mapping = [0u8; NB_VALUES];
    for (rank, &value) in ranked.iter().enumerate() {
        mapping[value as usize] = target_by_rank[rank];
    }
    cards
        .iter()
        .map(|c| c.with_value(attr, mapping[c.value(attr) as usize]))
        .collect()
}

/// Renames fill values so that flood, the most visible style, is the rarest
pub fn rebalance_fill_attribute(cards: &[Card]) -> Vec<Card> {
    relabel_by_rank(cards, Attribute::Fill, FILL_TARGET_BY_RANK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::no_set_list::{ConstructionLimits, construct_no_set_subset};
    use crate::set::{count_sets, deck};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const PERMUTATIONS: [[u8; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    fn no_set_20(seed: u64) -> Vec<Card> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        construct_no_set_subset(&ConstructionLimits::default(), &mut rng)
            .expect("construction")
            .cards()
    }

    #[test]
    fn test_rank_values_ties_in_value_order() {
        assert_eq!(rank_values(&[5, 2, 9]), [1, 0, 2]);
        assert_eq!(rank_values(&[4, 4, 1]), [2, 0, 1]);
        assert_eq!(rank_values(&[0, 0, 0]), [0, 1, 2]);
    }

    #[test]
    fn test_flood_becomes_rarest_fill() {
        let cards = no_set_20(17);
        let rebalanced = rebalance_fill_attribute(&cards);
        let counts = value_counts(&rebalanced, Attribute::Fill);
        let flood = counts[1];
        assert!(flood <= counts[0] && flood <= counts[2], "counts {:?}", counts);
        assert!(counts[0] <= counts[2], "counts {:?}", counts);
        // other attributes untouched
        for (a, b) in cards.iter().zip(rebalanced.iter()) {
            assert_eq!(a.value(Attribute::Color), b.value(Attribute::Color));
            assert_eq!(a.value(Attribute::Shape), b.value(Attribute::Shape));
            assert_eq!(a.value(Attribute::Count), b.value(Attribute::Count));
        }
    }

    #[test]
    fn test_any_relabeling_keeps_the_table_set_free() {
        for seed in 0..5 {
            let cards = no_set_20(seed);
            for attr in Attribute::ALL {
                for perm in PERMUTATIONS {
                    let relabeled: Vec<Card> = cards
                        .iter()
                        .map(|c| c.with_value(attr, perm[c.value(attr) as usize]))
                        .collect();
                    let mut distinct = relabeled.clone();
                    distinct.sort();
                    distinct.dedup();
                    assert_eq!(distinct.len(), 20);
                    assert_eq!(count_sets(&relabeled), 0);
                }
            }
            assert_eq!(count_sets(&rebalance_fill_attribute(&cards)), 0);
        }
    }

    #[test]
    fn test_relabeling_maps_sets_to_sets() {
        let d = deck();
        for perm in PERMUTATIONS {
            let relabeled: Vec<Card> = d.iter().map(|c| c.with_value(Attribute::Fill, perm[c.value(Attribute::Fill) as usize])).collect();
            assert_eq!(count_sets(&relabeled), 1080);
        }
    }

    #[test]
    fn test_second_pass_is_identity_when_counts_differ() {
        for seed in 0..10 {
            let once = rebalance_fill_attribute(&no_set_20(seed));
            let counts = value_counts(&once, Attribute::Fill);
            let twice = rebalance_fill_attribute(&once);
            assert_eq!(count_sets(&twice), 0);
            if counts[0] != counts[1] && counts[1] != counts[2] && counts[0] != counts[2] {
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn test_generic_rebalance_rejects_non_permutation() {
        let err = rebalance_attribute(&deck()[..20], Attribute::Color, [0, 0, 1]).unwrap_err();
        assert!(matches!(err, PuzzleError::Config(_)));
        let same = rebalance_attribute(&deck()[..20], Attribute::Color, [0, 1, 2]).expect("identity ranks");
        // only red cards: red is the most frequent value, mapped to 2
        assert!(same.iter().all(|c| c.value(Attribute::Color) == 2));
    }
}
