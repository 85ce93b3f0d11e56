//! From an empty table to a laid-out puzzle
//!
//! construct a no-set-list -> check it holds no set -> lay it out in the grid
//! -> optionally relabel the fills -> check again

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PuzzleConfig;
use crate::error::{PuzzleError, Result};
use crate::layout::{Arrangement, optimize_layout};
use crate::no_set_list::construct_no_set_subset;
use crate::rebalance::rebalance_fill_attribute;
use crate::set::{Card, count_sets};

/// A laid-out table whose last cell hides the answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// Seed which reproduces this puzzle with the same config
    pub seed: u64,
    pub arrangement: Arrangement,
    pub rebalanced: bool,
}

impl Puzzle {
    pub fn answer(&self) -> Card {
        self.arrangement.answer()
    }

    pub fn masked_cell(&self) -> usize {
        self.arrangement.masked_cell()
    }

    pub fn score(&self) -> usize {
        self.arrangement.score()
    }

    /// Human readable description, as written to puzzle.json
    pub fn describe(&self) -> PuzzleDescription {
        PuzzleDescription {
            seed: self.seed,
            score: self.score(),
            rows: self.arrangement.grid().rows,
            cols: self.arrangement.grid().cols,
            masked_cell: self.masked_cell(),
            answer: CardNames::from(self.answer()),
            cells: self.arrangement.cards().iter().map(|&c| CardNames::from(c)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardNames {
    pub color: String,
    pub shape: String,
    pub fill: String,
    pub count: String,
}

impl From<Card> for CardNames {
    fn from(card: Card) -> Self {
        let [color, shape, fill, count] = card.names();
        Self {
            color: color.to_string(),
            shape: shape.to_string(),
            fill: fill.to_string(),
            count: count.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDescription {
    pub seed: u64,
    pub score: usize,
    pub rows: usize,
    pub cols: usize,
    pub masked_cell: usize,
    pub answer: CardNames,
    pub cells: Vec<CardNames>,
}

fn check_no_set(cards: &[Card]) -> Result<()> {
    match count_sets(cards) {
        0 => Ok(()),
        count => {
            warn!("table of {} cards holds {} set(s)", cards.len(), count);
            Err(PuzzleError::SetFound { count })
        }
    }
}

/// Builds a puzzle, seeding the random generator from `config.seed` (or a
/// fresh random seed)
pub fn generate_puzzle(config: &PuzzleConfig) -> Result<Puzzle> {
    let seed = config.seed.unwrap_or_else(rand::random);
    info!("generating puzzle with seed {}", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut puzzle = generate_puzzle_with_rng(config, &mut rng)?;
    puzzle.seed = seed;
    Ok(puzzle)
}

/// Builds a puzzle drawing every random choice from `rng`. The returned
/// puzzle's seed is left at 0.
pub fn generate_puzzle_with_rng<R: Rng + ?Sized>(config: &PuzzleConfig, rng: &mut R) -> Result<Puzzle> {
    config.validate()?;
    let nsl = construct_no_set_subset(&config.construction_limits(), rng)?;
    let cards = nsl.cards();
    check_no_set(&cards)?;

    let mut arrangement = optimize_layout(&cards, config.grid()?, config.iterations, rng)?;
    if config.rebalance_fill {
        // renaming one attribute keeps equal values equal: the score holds
        arrangement.relabel_cards(rebalance_fill_attribute)?;
        check_no_set(arrangement.cards())?;
    }
    info!("puzzle ready: score {}, answer {}", arrangement.score(), arrangement.answer());
    Ok(Puzzle {
        seed: 0,
        arrangement,
        rebalanced: config.rebalance_fill,
    })
}
