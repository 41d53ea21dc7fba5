use ndarray::Array2;

/// Single coordinate axis used for the board side length and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Packed `row * size + col` key of a single cell.
pub type CellIndex = u16;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Number of cells on a square board with the given side.
pub const fn square(side: Coord) -> CellCount {
    let side = side as CellCount;
    side.saturating_mul(side)
}

pub(crate) const fn pack(coords: Coord2, side: Coord) -> CellIndex {
    coords.0 as CellIndex * side as CellIndex + coords.1 as CellIndex
}

pub(crate) const fn unpack(index: CellIndex, side: Coord) -> Coord2 {
    let side = side as CellIndex;
    ((index / side) as Coord, (index % side) as Coord)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let (rows, cols) = self.dim();
        let clip = |len: usize| Coord::try_from(len).unwrap_or(Coord::MAX);
        NeighborIter::new(index, (clip(rows), clip(cols)))
    }
}

pub trait NeighborCellIterExt<T> {
    fn iter_neighbor_cells(&self, index: Coord2) -> impl Iterator<Item = T>;
}

impl<T: Copy> NeighborCellIterExt<T> for Array2<T> {
    fn iter_neighbor_cells(&self, index: Coord2) -> impl Iterator<Item = T> {
        self.iter_neighbors(index).map(|pos| self[pos.to_nd_index()])
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it stays on the board.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= cols {
        return None;
    }

    Some((next_row, next_col))
}

/// The up-to-8 cells touching `center`, orthogonally or diagonally.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn neighbors_are_clipped_at_the_edges() {
        let corner: Vec<_> = NeighborIter::new((0, 0), (9, 9)).collect();
        assert_eq!(corner, [(0, 1), (1, 0), (1, 1)]);

        let edge = NeighborIter::new((8, 4), (9, 9)).count();
        assert_eq!(edge, 5);

        let inner = NeighborIter::new((4, 4), (9, 9)).count();
        assert_eq!(inner, 8);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(NeighborIter::new((0, 0), (1, 1)).next(), None);
    }

    #[test]
    fn pack_and_unpack_agree() {
        assert_eq!(pack((3, 7), 16), 55);
        assert_eq!(unpack(55, 16), (3, 7));
        assert_eq!(unpack(pack((254, 254), 255), 255), (254, 254));
    }
}
