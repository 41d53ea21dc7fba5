use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Complete board state as plain data, for an external save format.
///
/// Adjacency counts are not stored, they are recomputed on restore.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord,
    pub mine_count: CellCount,
    /// Empty while the first reveal has not happened yet.
    pub mines: Vec<Coord2>,
    pub revealed: Vec<Coord2>,
    pub flagged: Vec<Coord2>,
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        board.snapshot()
    }
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = GameError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self> {
        Board::restore(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Row 6 is a wall of mines, so the opening at (2, 4) cannot reach rows 7 and 8.
    fn played_board() -> Board {
        let mut mines: Vec<Coord2> = (0..9).map(|col| (6, col)).collect();
        mines.push((8, 8));

        let mut board = Board::new(9).unwrap();
        board
            .place_mines_avoiding((2, 4), &mut FixedPlacer::new(mines))
            .unwrap();
        board.reveal((2, 4)).unwrap();
        board.toggle_flag((8, 0)).unwrap();
        board
    }

    #[test]
    fn json_round_trip_restores_identical_board() {
        let board = played_board();

        let json = serde_json::to_string(&BoardSnapshot::from(&board)).unwrap();
        let snapshot: BoardSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Board::try_from(snapshot).unwrap();

        assert_eq!(restored, board);
        assert_eq!(restored.render_rows(), board.render_rows());
    }

    #[test]
    fn snapshot_lists_are_sorted() {
        let snapshot = played_board().snapshot();

        assert_eq!(snapshot.mines.len(), 10);
        assert!(snapshot.mines.is_sorted());
        assert!(snapshot.revealed.is_sorted());
        assert_eq!(snapshot.flagged.len(), 1);
    }

    #[test]
    fn restore_keeps_a_board_waiting_for_its_first_reveal() {
        let mut board = Board::new(16).unwrap();
        board.toggle_flag((0, 0)).unwrap();

        let restored = Board::restore(board.snapshot()).unwrap();

        assert!(!restored.has_mines());
        assert!(restored.is_flagged((0, 0)));
        assert_eq!(restored.mine_count(), 40);
    }

    #[test]
    fn restore_finds_the_triggered_mine() {
        let mut board = Board::from_mine_coords(3, &[(0, 0)]).unwrap();
        board.reveal((0, 0)).unwrap();

        let restored = Board::restore(board.snapshot()).unwrap();

        assert!(restored.is_mine_revealed());
        assert_eq!(restored.triggered_mine(), Some((0, 0)));
    }

    #[test]
    fn restore_rejects_inconsistent_state() {
        let base = BoardSnapshot {
            size: 4,
            mine_count: 1,
            mines: vec![(0, 0)],
            revealed: vec![(3, 3)],
            flagged: vec![],
        };
        assert!(Board::restore(base.clone()).is_ok());

        let overlapping = BoardSnapshot {
            flagged: vec![(3, 3)],
            ..base.clone()
        };
        assert_eq!(Board::restore(overlapping), Err(GameError::InvalidSnapshot));

        let off_grid = BoardSnapshot {
            revealed: vec![(4, 0)],
            ..base.clone()
        };
        assert_eq!(Board::restore(off_grid), Err(GameError::InvalidSnapshot));

        let wrong_count = BoardSnapshot {
            mines: vec![(0, 0), (0, 1)],
            ..base.clone()
        };
        assert_eq!(Board::restore(wrong_count), Err(GameError::InvalidSnapshot));

        let revealed_before_mines = BoardSnapshot {
            mines: vec![],
            ..base
        };
        assert_eq!(
            Board::restore(revealed_before_mines),
            Err(GameError::InvalidSnapshot)
        );

        // Pending mine counts must still fit around a safe first reveal.
        for mine_count in [0, 80] {
            let unplayable = BoardSnapshot {
                size: 9,
                mine_count,
                mines: vec![],
                revealed: vec![],
                flagged: vec![],
            };
            assert_eq!(
                Board::restore(unplayable),
                Err(GameError::InvalidSnapshot),
                "mine_count {}",
                mine_count
            );
        }
    }
}
