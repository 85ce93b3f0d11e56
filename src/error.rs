//! Errors raised while building a puzzle

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PuzzleError>;

#[derive(Error, Debug)]
pub enum PuzzleError {
    /// Every construction attempt hit the step cap before reaching the target
    #[error("no set-free subset found after {restarts} restarts")]
    ConstructionExhausted {
        /// Number of discarded attempts
        restarts: u64,
    },

    /// No set-free subset of that size exists in the deck
    #[error("cannot lay out {requested} cards without a set (maximum is {max})")]
    TargetTooLarge { requested: usize, max: usize },

    /// A constructed subset still holds sets
    #[error("constructed subset contains {count} set(s)")]
    SetFound { count: usize },

    /// Layout input does not fill the grid exactly
    #[error("{cards} cards cannot fill a grid of {cells} cells")]
    GridMismatch { cards: usize, cells: usize },

    #[error("grid must have at least one row and one column")]
    EmptyGrid,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
