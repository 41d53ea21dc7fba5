use alloc::vec::Vec;
use core::iter;
use hashbrown::HashSet;
use ndarray::Array2;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Number of cells newly revealed, including the flood fill.
    Revealed(CellCount),
    HitMine,
}

impl RevealOutcome {
    pub const fn hit_mine(self) -> bool {
        matches!(self, Self::HitMine)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
}

/// The board engine: mine layout, adjacency counts and the player's reveals and flags.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    size: Coord,
    mine_count: CellCount,
    grid: Array2<Cell>,
    revealed: HashSet<CellIndex>,
    flagged: HashSet<CellIndex>,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Empty board with the standard mine count for `size`; mines come with the first reveal.
    pub fn new(size: Coord) -> Result<Self> {
        Ok(Self::with_config(GameConfig::for_size(size)?))
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self::empty(config.size, config.mines)
    }

    /// Board with a hand-built layout, adjacency already computed.
    pub fn from_mine_coords(size: Coord, mines: &[Coord2]) -> Result<Self> {
        if size == 0 {
            return Err(GameError::UnsupportedSize(size));
        }

        let mut board = Self::empty(size, 0);
        for &coords in mines {
            let coords = board
                .validate_coords(coords)
                .map_err(|_| GameError::InvalidLayout)?;
            board.grid[coords.to_nd_index()].is_mine = true;
        }
        board.mine_count = board
            .grid
            .iter()
            .filter(|cell| cell.is_mine)
            .count()
            .try_into()
            .map_err(|_| GameError::InvalidLayout)?;
        board.compute_adjacency();
        Ok(board)
    }

    fn empty(size: Coord, mine_count: CellCount) -> Self {
        Self {
            size,
            mine_count,
            grid: Array2::default((usize::from(size), usize::from(size))),
            revealed: HashSet::new(),
            flagged: HashSet::new(),
            triggered_mine: None,
        }
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged.len().try_into().unwrap_or(CellCount::MAX)
    }

    /// Mines not yet accounted for by a flag; negative when the player over-flags.
    pub fn mines_left(&self) -> isize {
        (self.mine_count as isize) - (self.flagged.len() as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn has_mines(&self) -> bool {
        self.grid.iter().any(|cell| cell.is_mine)
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.grid[coords.to_nd_index()].is_mine
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.grid[coords.to_nd_index()].adjacent_mines
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.revealed.contains(&self.index_of(coords))
    }

    pub fn is_flagged(&self, coords: Coord2) -> bool {
        self.flagged.contains(&self.index_of(coords))
    }

    pub fn validate_coords(&self, coords: Coord2) -> core::result::Result<Coord2, InvalidMove> {
        if coords.0 < self.size && coords.1 < self.size {
            Ok(coords)
        } else {
            Err(InvalidMove::OffGrid)
        }
    }

    /// Converts raw move coordinates, which may be negative or oversized, to board coordinates.
    pub fn checked_coords(
        &self,
        row: i32,
        col: i32,
    ) -> core::result::Result<Coord2, InvalidMove> {
        let row = Coord::try_from(row).map_err(|_| InvalidMove::OffGrid)?;
        let col = Coord::try_from(col).map_err(|_| InvalidMove::OffGrid)?;
        self.validate_coords((row, col))
    }

    pub fn check_move(
        &self,
        action: MoveAction,
        row: i32,
        col: i32,
    ) -> core::result::Result<Coord2, InvalidMove> {
        let coords = self.checked_coords(row, col)?;
        self.check_target(action, coords)?;
        Ok(coords)
    }

    pub fn is_valid_move(&self, action: MoveAction, row: i32, col: i32) -> bool {
        self.check_move(action, row, col).is_ok()
    }

    fn check_target(
        &self,
        action: MoveAction,
        coords: Coord2,
    ) -> core::result::Result<(), InvalidMove> {
        if self.is_revealed(coords) {
            return Err(InvalidMove::AlreadyRevealed);
        }
        if action == MoveAction::Reveal && self.is_flagged(coords) {
            return Err(InvalidMove::Flagged);
        }
        Ok(())
    }

    /// Lays `mine_count` mines anywhere except `safe` and its neighbors, then computes adjacency.
    ///
    /// Only allowed once, before anything is revealed. A layout from `placer` that is short,
    /// repeats a cell, leaves the grid or touches the safe region is rejected and the board is
    /// left without mines.
    pub fn place_mines_avoiding<P: MinePlacer + ?Sized>(
        &mut self,
        safe: Coord2,
        placer: &mut P,
    ) -> Result<()> {
        let safe = self.validate_coords(safe)?;
        if !self.revealed.is_empty() || self.has_mines() {
            return Err(GameError::BoardAlreadyStarted);
        }

        let excluded: Vec<Coord2> = iter::once(safe)
            .chain(self.grid.iter_neighbors(safe))
            .collect();
        let chosen = placer.choose_mines(self.size, self.mine_count, &excluded);
        if chosen.len() != usize::from(self.mine_count) {
            log::warn!(
                "Placer returned {} mines, expected {}",
                chosen.len(),
                self.mine_count
            );
            return Err(GameError::InvalidLayout);
        }

        for coords in chosen {
            let fits = self
                .validate_coords(coords)
                .is_ok_and(|coords| !excluded.contains(&coords) && !self.has_mine_at(coords));
            if !fits {
                self.clear_mines();
                return Err(GameError::InvalidLayout);
            }
            self.grid[coords.to_nd_index()].is_mine = true;
        }

        self.compute_adjacency();
        log::debug!("Placed {} mines avoiding {:?}", self.mine_count, safe);
        Ok(())
    }

    /// Recounts the mine neighbors of every safe cell.
    pub fn compute_adjacency(&mut self) {
        for row in 0..self.size {
            for col in 0..self.size {
                let coords = (row, col);
                let adjacent_mines = if self.has_mine_at(coords) {
                    0
                } else {
                    self.count_adjacent_mines(coords)
                };
                self.grid[coords.to_nd_index()].adjacent_mines = adjacent_mines;
            }
        }
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        self.grid
            .iter_neighbor_cells(coords)
            .filter(|cell| cell.is_mine)
            .count() as u8
    }

    fn clear_mines(&mut self) {
        self.grid.fill(Cell::default());
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;
        self.check_target(MoveAction::Reveal, coords)?;
        if self.revealed.is_empty() && self.mine_count > 0 && !self.has_mines() {
            return Err(GameError::MinesNotPlaced);
        }

        let index = self.index_of(coords);
        self.revealed.insert(index);
        let cell = self.grid[coords.to_nd_index()];
        if cell.is_mine {
            log::debug!("Mine hit at {:?}", coords);
            self.triggered_mine = Some(coords);
            return Ok(RevealOutcome::HitMine);
        }

        let mut revealed = 1;
        if cell.adjacent_mines == 0 {
            revealed += self.expand_from(coords);
        }
        Ok(RevealOutcome::Revealed(revealed))
    }

    /// Opens every safe cell reachable from `origin` through zero-count cells.
    ///
    /// RevealedSet membership is the visited guard. Mines are never pushed and flagged cells are
    /// left alone.
    fn expand_from(&mut self, origin: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = alloc::vec![origin];

        while let Some(coords) = to_visit.pop() {
            for pos in self.grid.iter_neighbors(coords) {
                let cell = self.grid[pos.to_nd_index()];
                let index = self.index_of(pos);
                if cell.is_mine || self.flagged.contains(&index) || !self.revealed.insert(index) {
                    continue;
                }

                opened += 1;
                if cell.adjacent_mines == 0 {
                    to_visit.push(pos);
                }
            }
        }

        log::trace!("Flood fill from {:?} opened {} cells", origin, opened);
        opened
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;
        self.check_target(MoveAction::Flag, coords)?;

        let index = self.index_of(coords);
        Ok(if self.flagged.remove(&index) {
            FlagOutcome::Unflagged
        } else {
            self.flagged.insert(index);
            FlagOutcome::Flagged
        })
    }

    /// Loss condition.
    pub fn is_mine_revealed(&self) -> bool {
        self.triggered_mine.is_some()
    }

    /// Win condition.
    pub fn is_all_safe_cells_revealed(&self) -> bool {
        !self.is_mine_revealed() && self.revealed.len() == usize::from(self.safe_cell_count())
    }

    pub fn is_finished(&self) -> bool {
        self.is_mine_revealed() || self.is_all_safe_cells_revealed()
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        let index = self.index_of(coords);
        let cell = self.grid[coords.to_nd_index()];

        if self.revealed.contains(&index) {
            if cell.is_mine {
                CellView::Mine
            } else {
                CellView::Revealed(cell.adjacent_mines)
            }
        } else if self.flagged.contains(&index) {
            CellView::Flagged
        } else {
            CellView::Hidden
        }
    }

    /// Player-visible projection of the grid, one row at a time.
    pub fn render_rows(&self) -> Vec<Vec<CellView>> {
        (0..self.size)
            .map(|row| (0..self.size).map(|col| self.cell_view((row, col))).collect())
            .collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let sorted = |set: &HashSet<CellIndex>| {
            let mut indices: Vec<CellIndex> = set.iter().copied().collect();
            indices.sort_unstable();
            indices
                .into_iter()
                .map(|index| unpack(index, self.size))
                .collect()
        };

        BoardSnapshot {
            size: self.size,
            mine_count: self.mine_count,
            mines: self
                .grid
                .indexed_iter()
                .filter(|(_, cell)| cell.is_mine)
                .map(|((row, col), _)| (row as Coord, col as Coord))
                .collect(),
            revealed: sorted(&self.revealed),
            flagged: sorted(&self.flagged),
        }
    }

    /// Rebuilds a board from saved state, re-checking everything the engine relies on.
    pub fn restore(snapshot: BoardSnapshot) -> Result<Self> {
        let BoardSnapshot {
            size,
            mine_count,
            mines,
            revealed,
            flagged,
        } = snapshot;

        if size == 0 || mine_count > square(size) {
            return Err(GameError::InvalidSnapshot);
        }

        let mut board = Self::empty(size, mine_count);
        for coords in mines {
            let coords = board
                .validate_coords(coords)
                .map_err(|_| GameError::InvalidSnapshot)?;
            board.grid[coords.to_nd_index()].is_mine = true;
        }

        let placed = board.grid.iter().filter(|cell| cell.is_mine).count();
        let mines_pending = placed == 0;
        if !mines_pending && placed != usize::from(mine_count) {
            return Err(GameError::InvalidSnapshot);
        }
        if mines_pending {
            if !revealed.is_empty() {
                return Err(GameError::InvalidSnapshot);
            }
            GameConfig::new(size, mine_count).map_err(|_| GameError::InvalidSnapshot)?;
        }
        board.compute_adjacency();

        for coords in revealed {
            let coords = board
                .validate_coords(coords)
                .map_err(|_| GameError::InvalidSnapshot)?;
            let index = board.index_of(coords);
            board.revealed.insert(index);
            if board.has_mine_at(coords) && board.triggered_mine.is_none() {
                board.triggered_mine = Some(coords);
            }
        }

        for coords in flagged {
            let coords = board
                .validate_coords(coords)
                .map_err(|_| GameError::InvalidSnapshot)?;
            let index = board.index_of(coords);
            if board.revealed.contains(&index) {
                return Err(GameError::InvalidSnapshot);
            }
            board.flagged.insert(index);
        }

        Ok(board)
    }

    fn index_of(&self, coords: Coord2) -> CellIndex {
        pack(coords, self.size)
    }
}
