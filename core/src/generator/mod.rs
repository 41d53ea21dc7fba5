use alloc::vec::Vec;

use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Source of mine positions for [`Board::place_mines_avoiding`].
pub trait MinePlacer {
    /// Picks `mine_count` distinct cells of a `size`x`size` board, none of them in `excluded`.
    fn choose_mines(
        &mut self,
        size: Coord,
        mine_count: CellCount,
        excluded: &[Coord2],
    ) -> Vec<Coord2>;
}
