use alloc::vec::Vec;

use super::*;

/// Predetermined layout, used for scripted games and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedPlacer {
    mines: Vec<Coord2>,
}

impl FixedPlacer {
    pub fn new(mines: Vec<Coord2>) -> Self {
        Self { mines }
    }
}

impl MinePlacer for FixedPlacer {
    fn choose_mines(
        &mut self,
        _size: Coord,
        _mine_count: CellCount,
        _excluded: &[Coord2],
    ) -> Vec<Coord2> {
        self.mines.clone()
    }
}
