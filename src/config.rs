//! Puzzle generation settings, loadable from a JSON file

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::layout::Grid;
use crate::no_set_list::ConstructionLimits;
use crate::set::MAX_NO_SET_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Cards on the table (answer included)
    pub target_size: usize,
    /// Grow/repair steps per construction attempt
    pub max_steps: usize,
    /// Cards removed when the construction is stuck
    pub max_removals: usize,
    /// Discarded attempts before giving up (null: unbounded)
    pub max_restarts: Option<u64>,
    pub rows: usize,
    pub cols: usize,
    /// Random shuffles tried by the layout optimizer
    pub iterations: usize,
    /// Relabel fills so that flood is the rarest
    pub rebalance_fill: bool,
    /// Seed of the random generator (random if absent)
    pub seed: Option<u64>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        let limits = ConstructionLimits::default();
        let grid = Grid::default();
        Self {
            target_size: limits.target_size,
            max_steps: limits.max_steps,
            max_removals: limits.max_removals,
            max_restarts: limits.max_restarts,
            rows: grid.rows,
            cols: grid.cols,
            iterations: 1000,
            rebalance_fill: false,
            seed: None,
        }
    }
}

impl PuzzleConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PuzzleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_size > MAX_NO_SET_SIZE {
            return Err(PuzzleError::TargetTooLarge {
                requested: self.target_size,
                max: MAX_NO_SET_SIZE,
            });
        }
        let cells = self.grid()?.check()?;
        if cells != self.target_size {
            return Err(PuzzleError::Config(format!(
                "a {}x{} grid needs {} cards, target size is {}",
                self.rows, self.cols, cells, self.target_size
            )));
        }
        Ok(())
    }

    pub fn construction_limits(&self) -> ConstructionLimits {
        ConstructionLimits {
            target_size: self.target_size,
            max_steps: self.max_steps,
            max_removals: self.max_removals,
            max_restarts: self.max_restarts,
        }
    }

    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.rows, self.cols)
    }
}
