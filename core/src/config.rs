use serde::{Deserialize, Serialize};

use crate::*;

/// Cells kept free of mines around the first reveal: the cell and its 8 neighbors.
pub const SAFE_NEIGHBORHOOD: CellCount = 9;

/// Smallest side that still leaves room for a mine outside the safe neighborhood.
pub const MIN_SIZE: Coord = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const BEGINNER: Self = Self::new_unchecked(9, 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked(16, 40);

    pub const fn new_unchecked(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord, mines: CellCount) -> Result<Self> {
        if size < MIN_SIZE {
            return Err(GameError::UnsupportedSize(size));
        }
        let max = max_mines(size);
        if mines == 0 || mines > max {
            return Err(GameError::InvalidMineCount { mines, max });
        }
        Ok(Self::new_unchecked(size, mines))
    }

    /// Config with the standard mine count for a board of this side.
    pub fn for_size(size: Coord) -> Result<Self> {
        if size < MIN_SIZE {
            return Err(GameError::UnsupportedSize(size));
        }
        Self::new(size, default_mine_count(size))
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub const fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}

/// Largest mine count that still leaves the first reveal's neighborhood free.
pub const fn max_mines(size: Coord) -> CellCount {
    square(size).saturating_sub(SAFE_NEIGHBORHOOD)
}

/// 10 mines on 9x9, 40 on 16x16, and the 16x16 density (5/32) for any other side.
pub fn default_mine_count(size: Coord) -> CellCount {
    match size {
        9 => 10,
        16 => 40,
        _ => {
            let cells = u32::from(square(size));
            let mines = CellCount::try_from((cells * 5 + 16) / 32).unwrap_or(CellCount::MAX);
            mines.clamp(1, max_mines(size).max(1))
        }
    }
}
