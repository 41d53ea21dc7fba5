use alloc::vec::Vec;
use core::fmt;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    /// No mines yet, they are laid around the first revealed cell.
    AwaitingFirstMove,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    /// State of a board that was built or restored outside the controller.
    pub fn of(board: &Board) -> Self {
        if board.is_mine_revealed() {
            Self::Lost
        } else if board.is_all_safe_cells_revealed() {
            Self::Won
        } else if board.has_mines() {
            Self::InProgress
        } else {
            Self::AwaitingFirstMove
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn outcome(self) -> Option<GameOutcome> {
        match self {
            Self::Won => Some(GameOutcome::Won),
            Self::Lost => Some(GameOutcome::Lost),
            Self::AwaitingFirstMove | Self::InProgress => None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::AwaitingFirstMove
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveAction {
    Reveal,
    Flag,
}

/// A move as produced by a [`MoveSource`]. Coordinates are unchecked.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    Cell {
        action: MoveAction,
        row: i32,
        col: i32,
    },
    Save,
}

impl Move {
    pub const fn reveal(row: i32, col: i32) -> Self {
        Self::Cell {
            action: MoveAction::Reveal,
            row,
            col,
        }
    }

    pub const fn flag(row: i32, col: i32) -> Self {
        Self::Cell {
            action: MoveAction::Flag,
            row,
            col,
        }
    }
}

/// How [`Game::run`] stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Won,
    Lost,
    Saved,
    /// The move source ran dry before the game ended.
    Quit,
}

pub trait MoveSource {
    /// Next move for the current board, `None` once the source is exhausted.
    fn next_move(&mut self, board: &Board) -> Option<Move>;
}

pub trait Renderer {
    fn render(&mut self, rows: &[Vec<CellView>]);

    fn reject(&mut self, _reason: InvalidMove) {}

    fn announce(&mut self, outcome: GameOutcome);
}

pub trait Persistence {
    type Error: fmt::Display;

    fn save(&mut self, snapshot: &BoardSnapshot) -> core::result::Result<(), Self::Error>;
}

/// Turn loop around a [`Board`]: lazy mine placement, move validation and termination.
#[derive(Clone, Debug)]
pub struct Game<P> {
    board: Board,
    state: GameState,
    placer: P,
}

impl<P: MinePlacer> Game<P> {
    pub fn new(config: GameConfig, placer: P) -> Self {
        Self {
            board: Board::with_config(config),
            state: GameState::AwaitingFirstMove,
            placer,
        }
    }

    pub fn resume(board: Board, placer: P) -> Self {
        let state = GameState::of(&board);
        log::debug!("Resuming game in state {:?}", state);
        Self {
            board,
            state,
            placer,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    /// Applies one move. Only the first reveal places mines; flags before it leave the board
    /// waiting.
    pub fn play(&mut self, action: MoveAction, row: i32, col: i32) -> Result<GameState> {
        if self.state.is_finished() {
            return Err(GameError::AlreadyEnded);
        }

        let coords = self.board.check_move(action, row, col)?;
        match action {
            MoveAction::Flag => {
                let outcome = self.board.toggle_flag(coords)?;
                log::trace!("{:?} at {:?}", outcome, coords);
            }
            MoveAction::Reveal => {
                if self.state == GameState::AwaitingFirstMove {
                    self.board.place_mines_avoiding(coords, &mut self.placer)?;
                }

                let outcome = self.board.reveal(coords)?;
                log::trace!("Reveal at {:?}: {:?}", coords, outcome);
                self.state = if outcome.hit_mine() {
                    GameState::Lost
                } else if self.board.is_all_safe_cells_revealed() {
                    GameState::Won
                } else {
                    GameState::InProgress
                };
            }
        }

        Ok(self.state)
    }

    /// Drives the game until it ends, the player saves, or the move source runs out.
    ///
    /// Invalid moves go back to the renderer and another move is requested. A failed save is
    /// logged and play continues.
    pub fn run<S, R, W>(
        &mut self,
        source: &mut S,
        renderer: &mut R,
        persistence: &mut W,
    ) -> Result<GameOutcome>
    where
        S: MoveSource + ?Sized,
        R: Renderer + ?Sized,
        W: Persistence + ?Sized,
    {
        loop {
            renderer.render(&self.board.render_rows());

            if let Some(outcome) = self.state.outcome() {
                log::info!("Game over: {:?}", outcome);
                renderer.announce(outcome);
                return Ok(outcome);
            }

            let Some(next) = source.next_move(&self.board) else {
                log::info!("No more moves, leaving the game unfinished");
                return Ok(GameOutcome::Quit);
            };

            match next {
                Move::Save => match persistence.save(&self.board.snapshot()) {
                    Ok(()) => {
                        log::info!("Game saved");
                        return Ok(GameOutcome::Saved);
                    }
                    Err(err) => log::warn!("Could not save the game: {}", err),
                },
                Move::Cell { action, row, col } => match self.play(action, row, col) {
                    Ok(_) => {}
                    Err(GameError::InvalidMove(reason)) => {
                        log::debug!("Rejected {:?} at ({}, {}): {}", action, row, col, reason);
                        renderer.reject(reason);
                    }
                    Err(err) => return Err(err),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::VecDeque;
    use alloc::string::String;
    use alloc::vec;

    struct Script(VecDeque<Move>);

    impl Script {
        fn new(moves: impl IntoIterator<Item = Move>) -> Self {
            Self(moves.into_iter().collect())
        }
    }

    impl MoveSource for Script {
        fn next_move(&mut self, _board: &Board) -> Option<Move> {
            self.0.pop_front()
        }
    }

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        rejected: Vec<InvalidMove>,
        announced: Option<GameOutcome>,
    }

    impl Renderer for Recorder {
        fn render(&mut self, _rows: &[Vec<CellView>]) {
            self.frames += 1;
        }

        fn reject(&mut self, reason: InvalidMove) {
            self.rejected.push(reason);
        }

        fn announce(&mut self, outcome: GameOutcome) {
            self.announced = Some(outcome);
        }
    }

    #[derive(Default)]
    struct Vault {
        saved: Option<BoardSnapshot>,
        broken: bool,
    }

    impl Persistence for Vault {
        type Error = String;

        fn save(&mut self, snapshot: &BoardSnapshot) -> core::result::Result<(), String> {
            if self.broken {
                return Err(String::from("disk full"));
            }
            self.saved = Some(snapshot.clone());
            Ok(())
        }
    }

    /// 9x9 beginner board whose mines fill row 7 plus (8, 8), so (0, 0) opens rows 0 to 6.
    fn scripted_game() -> Game<FixedPlacer> {
        let mut mines: Vec<Coord2> = (0..9).map(|col| (7, col)).collect();
        mines.push((8, 8));
        Game::new(GameConfig::BEGINNER, FixedPlacer::new(mines))
    }

    #[test]
    fn flag_before_first_reveal_keeps_waiting() {
        let mut game = scripted_game();

        assert_eq!(
            game.play(MoveAction::Flag, 3, 3),
            Ok(GameState::AwaitingFirstMove)
        );
        assert!(!game.board().has_mines());
        assert!(game.board().is_flagged((3, 3)));
    }

    #[test]
    fn first_reveal_places_mines_and_is_never_a_loss() {
        for seed in 0..64 {
            let mut game = Game::new(GameConfig::BEGINNER, RandomPlacer::new(seed));
            let state = game.play(MoveAction::Reveal, 0, 8).unwrap();

            assert_ne!(state, GameState::Lost);
            assert!(game.board().has_mines());
            assert_eq!(game.board().adjacent_mine_count((0, 8)), 0);
        }
    }

    #[test]
    fn full_game_on_fixed_seed_is_won() {
        let mut game = Game::new(GameConfig::BEGINNER, RandomPlacer::new(2024));

        assert_eq!(game.state(), GameState::AwaitingFirstMove);
        game.play(MoveAction::Reveal, 4, 4).unwrap();

        let board = game.board();
        assert!(board.is_revealed((4, 4)));
        assert!(!board.has_mine_at((4, 4)));
        assert!(NeighborIter::new((4, 4), (9, 9)).all(|pos| !board.has_mine_at(pos)));
        assert_eq!(
            (0..9)
                .flat_map(|row| (0..9).map(move |col| (row, col)))
                .filter(|&pos| board.has_mine_at(pos))
                .count(),
            10
        );

        for row in 0..9 {
            for col in 0..9 {
                let board = game.board();
                if board.has_mine_at((row, col)) || board.is_revealed((row, col)) {
                    continue;
                }
                game.play(MoveAction::Reveal, row.into(), col.into()).unwrap();
                assert!(!game.board().is_mine_revealed());
            }
        }

        assert_eq!(game.state(), GameState::Won);
        assert_eq!(game.board().revealed_count(), 71);
        assert!(game.board().is_all_safe_cells_revealed());
        assert!(!game.board().is_mine_revealed());
    }

    #[test]
    fn revealing_a_known_mine_loses() {
        let mut game = scripted_game();
        assert_eq!(game.play(MoveAction::Reveal, 0, 0), Ok(GameState::InProgress));
        assert_eq!(game.board().revealed_count(), 63);

        assert_eq!(game.play(MoveAction::Reveal, 7, 0), Ok(GameState::Lost));
        assert!(game.board().is_mine_revealed());
        assert!(!game.board().is_all_safe_cells_revealed());
        assert_eq!(
            game.play(MoveAction::Reveal, 8, 0),
            Err(GameError::AlreadyEnded)
        );
    }

    #[test]
    fn invalid_moves_are_reported_and_skipped() {
        let mut game = scripted_game();
        let mut script = Script::new([
            Move::reveal(-1, 0),
            Move::flag(0, 0),
            Move::reveal(0, 0),
            Move::flag(0, 0),
            Move::reveal(0, 0),
            Move::reveal(0, 0),
            Move::reveal(9, 2),
        ]);
        let mut recorder = Recorder::default();

        let outcome = game
            .run(&mut script, &mut recorder, &mut Vault::default())
            .unwrap();

        assert_eq!(outcome, GameOutcome::Quit);
        assert_eq!(
            recorder.rejected,
            vec![
                InvalidMove::OffGrid,
                InvalidMove::Flagged,
                InvalidMove::AlreadyRevealed,
                InvalidMove::OffGrid,
            ]
        );
        assert_eq!(recorder.frames, 8);
        assert_eq!(game.state(), GameState::InProgress);
    }

    #[test]
    fn run_announces_the_result() {
        let mut game = scripted_game();
        let mut script = Script::new([
            Move::reveal(0, 0),
            Move::reveal(8, 0),
            Move::reveal(8, 1),
            Move::reveal(8, 2),
            Move::reveal(8, 3),
            Move::reveal(8, 4),
            Move::reveal(8, 5),
            Move::reveal(8, 6),
            Move::reveal(8, 7),
        ]);
        let mut recorder = Recorder::default();

        let outcome = game
            .run(&mut script, &mut recorder, &mut Vault::default())
            .unwrap();

        assert_eq!(outcome, GameOutcome::Won);
        assert_eq!(recorder.announced, Some(GameOutcome::Won));
        assert!(script.0.is_empty());
    }

    #[test]
    fn save_stops_the_loop_with_a_snapshot() {
        let mut game = scripted_game();
        let mut script = Script::new([Move::reveal(0, 0), Move::Save, Move::reveal(8, 0)]);
        let mut vault = Vault::default();

        let outcome = game
            .run(&mut script, &mut Recorder::default(), &mut vault)
            .unwrap();

        assert_eq!(outcome, GameOutcome::Saved);
        let saved = vault.saved.unwrap();
        assert_eq!(saved.revealed.len(), 63);
        assert_eq!(Board::restore(saved).unwrap(), *game.board());
    }

    #[test]
    fn failed_save_keeps_playing() {
        let mut game = scripted_game();
        let mut script = Script::new([Move::Save, Move::reveal(0, 0)]);
        let mut vault = Vault {
            broken: true,
            ..Vault::default()
        };

        let outcome = game
            .run(&mut script, &mut Recorder::default(), &mut vault)
            .unwrap();

        assert_eq!(outcome, GameOutcome::Quit);
        assert!(vault.saved.is_none());
        assert!(game.board().is_revealed((0, 0)));
    }

    #[test]
    fn resume_derives_state_from_the_board() {
        let mut game = scripted_game();
        game.play(MoveAction::Reveal, 0, 0).unwrap();

        let resumed = Game::resume(game.into_board(), RandomPlacer::new(0));
        assert_eq!(resumed.state(), GameState::InProgress);

        let fresh = Game::resume(Board::new(16).unwrap(), RandomPlacer::new(0));
        assert_eq!(fresh.state(), GameState::AwaitingFirstMove);

        let mut lost = Board::from_mine_coords(3, &[(0, 0)]).unwrap();
        lost.reveal((0, 0)).unwrap();
        assert_eq!(GameState::of(&lost), GameState::Lost);
    }
}
