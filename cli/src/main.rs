use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tripwire_core::{Board, Game, GameConfig, GameOutcome, RandomPlacer};

mod input;
mod render;
mod save;

use input::TerminalInput;
use render::TextRenderer;
use save::{Clock, SaveFile, SavedGame};

#[derive(Parser, Debug)]
#[command(version, about = "Terminal minesweeper", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Side length of the square board (9 has 10 mines, 16 has 40)
    #[arg(short = 'n', long, default_value_t = 9)]
    size: u8,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Resume a previously saved game
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Where `save` writes the game
    #[arg(long, default_value = "tripwire-save.json")]
    save_file: PathBuf,
}

fn init_logging(verbose: &Verbosity<WarnLevel>) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Seed from the wall clock, for when the player does not pick one.
fn clock_seed() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map_or(0, |since| since.as_nanos() as u64)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}", seed);
    let placer = RandomPlacer::new(seed);

    let (mut game, carried) = match &args.load {
        Some(path) => {
            let saved = SavedGame::load(path)?;
            let carried = saved.elapsed();
            let board = Board::try_from(saved.board)?;
            log::info!("Loaded {}x{} game from {}", board.size(), board.size(), path.display());
            (Game::resume(board, placer), carried)
        }
        None => (Game::new(GameConfig::for_size(args.size)?, placer), Duration::ZERO),
    };

    let mut input = TerminalInput::new(io::stdin().lock(), io::stdout());
    let mut renderer = TextRenderer::new(io::stdout());
    let mut save_file = SaveFile::new(args.save_file, Clock::start(carried));

    let outcome = game.run(&mut input, &mut renderer, &mut save_file)?;
    match outcome {
        GameOutcome::Won | GameOutcome::Lost => {
            println!("Time: {}s", save_file.clock().elapsed().as_secs());
        }
        GameOutcome::Saved => println!("Game saved to {}", save_file.path().display()),
        GameOutcome::Quit => {}
    }
    Ok(())
}
