//! Arrangement of a no-set-list into a grid
//!
//! Cards are compared with their near neighbors (cells at Manhattan distance 1
//! or 2). The score of an arrangement is the number of attributes shared by
//! neighbor cards: the lower, the less a player can rely on local patterns.
//! The optimizer samples independent random shuffles and keeps the best one.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PuzzleError, Result};
use crate::set::{Card, count_same};

/// Shape of the grid, cells numbered row by row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self { rows: 4, cols: 5 }
    }
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let grid = Self { rows, cols };
        grid.check()?;
        Ok(grid)
    }

    /// Rejects empty shapes and shapes whose cell count overflows
    pub fn check(&self) -> Result<usize> {
        if self.rows == 0 || self.cols == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        self.checked_cells().ok_or_else(|| {
            PuzzleError::Config(format!("a {}x{} grid has too many cells", self.rows, self.cols))
        })
    }

    pub fn checked_cells(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Number of cells, saturated at `usize::MAX`
    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// (row, col) of a cell
    pub fn coords(&self, cell: usize) -> (usize, usize) {
        (cell / self.cols, cell % self.cols)
    }

    /// All unordered pairs of cells at Manhattan distance 1 or 2, each pair
    /// listed once with the lower cell first
    pub fn neighbor_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.cells();
        let mut pairs = Vec::new();
        for a in 0..n {
            let (ra, ca) = self.coords(a);
            for b in (a + 1)..n {
                let (rb, cb) = self.coords(b);
                let dist = ra.abs_diff(rb) + ca.abs_diff(cb);
                if dist == 1 || dist == 2 {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

/// Sum over neighbor pairs of the number of attributes the two cards share
pub fn layout_score(cards: &[Card], pairs: &[(usize, usize)]) -> usize {
    pairs.iter().map(|&(a, b)| count_same(cards[a], cards[b])).sum()
}

/// Cards placed in a grid; the last cell is masked and holds the answer
///
/// The cards fill the grid exactly, so there is always at least one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawArrangement")]
pub struct Arrangement {
    grid: Grid,
    cards: Vec<Card>,
    score: usize,
}

// Unchecked shape read from JSON
#[derive(Deserialize)]
struct RawArrangement {
    grid: Grid,
    cards: Vec<Card>,
    score: usize,
}

impl TryFrom<RawArrangement> for Arrangement {
    type Error = PuzzleError;

    fn try_from(raw: RawArrangement) -> Result<Self> {
        Arrangement::new(raw.grid, raw.cards, raw.score)
    }
}

impl Arrangement {
    /// Checks that `cards` fill `grid` exactly
    pub fn new(grid: Grid, cards: Vec<Card>, score: usize) -> Result<Self> {
        let cells = grid.check()?;
        if cards.len() != cells {
            return Err(PuzzleError::GridMismatch {
                cards: cards.len(),
                cells,
            });
        }
        Ok(Self { grid, cards, score })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn masked_cell(&self) -> usize {
        self.cards.len() - 1
    }

    /// Card hidden from the player
    pub fn answer(&self) -> Card {
        self.cards[self.masked_cell()]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Card]> {
        self.cards.chunks(self.grid.cols)
    }

    /// Renames the cards in place, keeping their cells; `relabel` must return
    /// as many cards as it is given
    pub fn relabel_cards<F: FnOnce(&[Card]) -> Vec<Card>>(&mut self, relabel: F) -> Result<()> {
        let cards = relabel(&self.cards);
        if cards.len() != self.cards.len() {
            return Err(PuzzleError::GridMismatch {
                cards: cards.len(),
                cells: self.cards.len(),
            });
        }
        self.cards = cards;
        Ok(())
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = self.masked_cell();
        for (r, row) in self.rows().enumerate() {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(c, card)| {
                    if r * self.grid.cols + c == masked {
                        format!("{:<24}", "?")
                    } else {
                        format!("{:<24}", card.to_string())
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join(" ").trim_end())?;
        }
        Ok(())
    }
}

/// Shuffles `cards` into `grid` `iterations` times (at least once) and returns
/// the arrangement with the lowest score seen
pub fn optimize_layout<R: Rng + ?Sized>(
    cards: &[Card],
    grid: Grid,
    iterations: usize,
    rng: &mut R,
) -> Result<Arrangement> {
    let cells = grid.check()?;
    if cards.len() != cells {
        return Err(PuzzleError::GridMismatch {
            cards: cards.len(),
            cells,
        });
    }
    let pairs = grid.neighbor_pairs();
    let mut shuffled = cards.to_vec();
    let mut best: Option<(usize, Vec<Card>)> = None;
    for _ in 0..iterations.max(1) {
        shuffled.shuffle(rng);
        let score = layout_score(&shuffled, &pairs);
        if best.as_ref().is_none_or(|(best_score, _)| score < *best_score) {
            best = Some((score, shuffled.clone()));
        }
    }
    let (score, cards) = best.unwrap_or_else(|| (layout_score(&shuffled, &pairs), shuffled));
    info!("best layout score {} over {} shuffles", score, iterations.max(1));
    Arrangement::new(grid, cards, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::deck;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_neighbor_pairs_4x5() {
        let grid = Grid::default();
        let pairs = grid.neighbor_pairs();
        // 31 at distance 1, 46 at distance 2
        assert_eq!(pairs.len(), 77);
        assert!(pairs.contains(&(0, 1)));
        assert!(pairs.contains(&(0, 2)));
        assert!(pairs.contains(&(0, 6)));
        assert!(pairs.contains(&(0, 10)));
        assert!(!pairs.contains(&(0, 3)));
        assert!(!pairs.contains(&(0, 7)));
        assert!(!pairs.contains(&(4, 5)));
    }

    #[test]
    fn test_grid_rejects_empty_shape() {
        assert!(matches!(Grid::new(0, 5), Err(PuzzleError::EmptyGrid)));
        assert_eq!(Grid::new(5, 4).expect("grid").cells(), 20);
    }

    #[test]
    fn test_layout_score_counts_shared_attributes() {
        let grid = Grid::new(1, 3).expect("grid");
        let pairs = grid.neighbor_pairs();
        let d = deck();
        // cards 0, 1, 2 share 3 attributes pairwise
        assert_eq!(layout_score(&[d[0], d[1], d[2]], &pairs), 9);
        // 0 and 80 share nothing, 0/40 and 40/80 share nothing either
        assert_eq!(layout_score(&[d[0], d[40], d[80]], &pairs), 0);
    }

    #[test]
    fn test_optimize_rejects_wrong_card_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = optimize_layout(&deck()[..19], Grid::default(), 10, &mut rng).unwrap_err();
        assert!(matches!(err, PuzzleError::GridMismatch { cards: 19, cells: 20 }));
    }

    #[test]
    fn test_optimize_keeps_cards_and_reports_best_score() {
        let cards = deck()[10..30].to_vec();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let arrangement = optimize_layout(&cards, Grid::default(), 200, &mut rng).expect("layout");
        let mut placed = arrangement.cards().to_vec();
        placed.sort();
        assert_eq!(placed, cards);
        let pairs = Grid::default().neighbor_pairs();
        assert_eq!(arrangement.score(), layout_score(arrangement.cards(), &pairs));
        assert_eq!(arrangement.answer(), arrangement.cards()[19]);
        assert_eq!(arrangement.rows().count(), 4);
    }

    #[test]
    fn test_more_iterations_never_worse_with_same_stream() {
        // the first shuffle of both runs is identical, so the longer run can
        // only improve on it
        let cards = deck()[30..50].to_vec();
        let one = optimize_layout(&cards, Grid::default(), 1, &mut ChaCha8Rng::seed_from_u64(11)).expect("one");
        let many = optimize_layout(&cards, Grid::default(), 500, &mut ChaCha8Rng::seed_from_u64(11)).expect("many");
        assert!(many.score() <= one.score());
    }

    #[test]
    fn test_zero_iterations_still_returns_a_layout() {
        let cards = deck()[0..20].to_vec();
        let arrangement = optimize_layout(&cards, Grid::default(), 0, &mut ChaCha8Rng::seed_from_u64(1)).expect("layout");
        assert_eq!(arrangement.cards().len(), 20);
    }

    #[test]
    fn test_grid_rejects_overflowing_shape() {
        let err = Grid::new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, PuzzleError::Config(_)));
        let huge = Grid { rows: usize::MAX, cols: 2 };
        assert_eq!(huge.checked_cells(), None);
        assert_eq!(huge.cells(), usize::MAX);
        let err = optimize_layout(&deck()[..20], huge, 1, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, PuzzleError::Config(_)));
    }

    #[test]
    fn test_arrangement_json_must_fill_the_grid() {
        let empty = r#"{"grid":{"rows":4,"cols":5},"cards":[],"score":0}"#;
        assert!(serde_json::from_str::<Arrangement>(empty).is_err());
        let no_cols = r#"{"grid":{"rows":1,"cols":0},"cards":[],"score":0}"#;
        assert!(serde_json::from_str::<Arrangement>(no_cols).is_err());
        let one = r#"{"grid":{"rows":1,"cols":1},"cards":[80],"score":0}"#;
        let arrangement: Arrangement = serde_json::from_str(one).expect("1x1 grid");
        assert_eq!(arrangement.answer(), deck()[80]);
        assert!(matches!(
            Arrangement::new(Grid::default(), Vec::new(), 0),
            Err(PuzzleError::GridMismatch { cards: 0, cells: 20 })
        ));
    }

    #[test]
    fn test_relabel_cards_keeps_the_card_count() {
        let mut arrangement = Arrangement::new(Grid::new(1, 2).expect("grid"), deck()[..2].to_vec(), 3).expect("2 cards");
        arrangement.relabel_cards(|cards| cards.iter().rev().copied().collect()).expect("same count");
        assert_eq!(arrangement.cards(), &[deck()[1], deck()[0]]);
        assert!(arrangement.relabel_cards(|_| Vec::new()).is_err());
        assert_eq!(arrangement.cards().len(), 2);
    }
}
