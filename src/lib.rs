//! Generator of "find the missing card" Set puzzles
//!
//! Builds 20 cards holding no set, spreads them over a 4x5 grid so that
//! neighbor cards look as different as possible, and hides the last one.

pub mod card_set;
pub mod config;
pub mod error;
pub mod io_helpers;
pub mod layout;
pub mod no_set_list;
pub mod puzzle;
pub mod rebalance;
pub mod render;
pub mod set;
pub mod utils;

pub use card_set::CardSet;
pub use config::PuzzleConfig;
pub use error::{PuzzleError, Result};
pub use layout::{Arrangement, Grid, optimize_layout};
pub use no_set_list::{ConstructionLimits, NoSetList, construct_no_set_subset};
pub use puzzle::{Puzzle, generate_puzzle};
pub use rebalance::rebalance_fill_attribute;
pub use set::{Attribute, Card, complete, count_sets, deck, is_set};
