use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tripwire_core::{BoardSnapshot, Persistence};
use web_time::Instant;

/// On-disk save format: the board plus the time already spent on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub board: BoardSnapshot,
    pub elapsed_secs: u64,
}

impl SavedGame {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read save file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("save file {} is corrupted", path.display()))
    }

    pub fn store(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .with_context(|| format!("could not write save file {}", path.display()))
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs(self.elapsed_secs)
    }
}

/// Game clock that keeps counting across saved sessions.
#[derive(Clone, Debug)]
pub struct Clock {
    started_at: Instant,
    carried: Duration,
}

impl Clock {
    pub fn start(carried: Duration) -> Self {
        Self {
            started_at: Instant::now(),
            carried,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.carried + self.started_at.elapsed()
    }
}

/// Writes the game to a JSON file when the player asks to save.
pub struct SaveFile {
    path: PathBuf,
    clock: Clock,
}

impl SaveFile {
    pub fn new(path: PathBuf, clock: Clock) -> Self {
        Self { path, clock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl Persistence for SaveFile {
    type Error = anyhow::Error;

    fn save(&mut self, snapshot: &BoardSnapshot) -> anyhow::Result<()> {
        let saved = SavedGame {
            board: snapshot.clone(),
            elapsed_secs: self.clock.elapsed().as_secs(),
        };
        saved.store(&self.path)?;
        log::debug!("Wrote save file {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripwire_core::{Board, FixedPlacer, Game, MoveAction};

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tripwire-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = scratch_path("round-trip");
        let mut game = Game::new(
            tripwire_core::GameConfig::BEGINNER,
            FixedPlacer::new((0..9).map(|col| (7, col)).chain([(8, 8)]).collect()),
        );
        game.play(MoveAction::Reveal, 0, 0).unwrap();
        game.play(MoveAction::Flag, 8, 8).unwrap();

        let mut save_file = SaveFile::new(path.clone(), Clock::start(Duration::from_secs(30)));
        save_file.save(&game.board().snapshot()).unwrap();

        let loaded = SavedGame::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(loaded.elapsed() >= Duration::from_secs(30));
        assert_eq!(Board::try_from(loaded.board).unwrap(), *game.board());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = scratch_path("missing");
        let err = SavedGame::load(&path).unwrap_err();
        assert!(err.to_string().contains("could not read save file"));
    }

    #[test]
    fn clock_carries_previous_sessions() {
        let clock = Clock::start(Duration::from_secs(90));
        assert!(clock.elapsed() >= Duration::from_secs(90));
    }
}
