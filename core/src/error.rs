use thiserror::Error;

use crate::{CellCount, Coord};

/// Reasons a single move is refused. The player is asked for another move.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidMove {
    #[error("coordinates are off the grid")]
    OffGrid,
    #[error("cell is already revealed")]
    AlreadyRevealed,
    #[error("cell is flagged, remove the flag first")]
    Flagged,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid move: {0}")]
    InvalidMove(#[from] InvalidMove),
    #[error("Unsupported board size {0}")]
    UnsupportedSize(Coord),
    #[error("Invalid mine count {mines}, expected between 1 and {max}")]
    InvalidMineCount { mines: CellCount, max: CellCount },
    #[error("Mine layout does not fit the board")]
    InvalidLayout,
    #[error("Mines can only be placed before any cell is revealed")]
    BoardAlreadyStarted,
    #[error("Mines must be placed before the first reveal")]
    MinesNotPlaced,
    #[error("Saved board is inconsistent")]
    InvalidSnapshot,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
