/// Hidden truth of a single grid position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_mine: bool,
    /// Mines among the on-grid neighbors, only meaningful when `is_mine` is false.
    pub adjacent_mines: u8,
}

/// What a player is allowed to see of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    Revealed(u8),
    /// Only reachable once the game is lost.
    Mine,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
