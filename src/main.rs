//! Slide Merge terminal front end
//!
//! Reads one key per line from stdin (or plays itself with `--autoplay`) and
//! prints the board after every move, as a text grid or as JSON lines for an
//! external presenter.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;

use slide_merge::platform::{Command, command_for_key};
use slide_merge::renderer::{render_board, render_status};
use slide_merge::sim::{Board, BoardError, Direction, GameEvent, GameState, autoplay_direction, step};
use slide_merge::{Settings, SettingsError};

#[derive(Parser, Debug)]
#[command(name = "slide-merge", about = "Slide and merge numbered tiles")]
struct Args {
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run seed (overrides the settings file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start from a board JSON file instead of a fresh game
    #[arg(long)]
    board: Option<PathBuf>,

    /// Let the engine play by itself
    #[arg(long, default_value_t = false)]
    autoplay: bool,

    /// Stop autoplay after this many moves
    #[arg(long, default_value_t = 10_000)]
    max_moves: u64,

    /// Print each frame as a JSON line instead of a text grid
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Startup failures reported before the first frame
#[derive(Debug, Error)]
enum AppError {
    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    #[error("{}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One JSON line per rendered board
#[derive(Serialize)]
struct Frame<'a> {
    moves: u64,
    direction: Option<Direction>,
    board: &'a Board,
    events: &'a [GameEvent],
    max_tile: u32,
    game_over: bool,
}

fn emit(
    out: &mut impl Write,
    state: &GameState,
    direction: Option<Direction>,
    events: &[GameEvent],
    json: bool,
) -> io::Result<()> {
    if json {
        let frame = Frame {
            moves: state.moves,
            direction,
            board: state.board(),
            events,
            max_tile: state.max_tile_value(),
            game_over: state.is_game_over(),
        };
        serde_json::to_writer(&mut *out, &frame)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_board(state.board()))?;
        writeln!(out, "{}", render_status(state))?;
    }
    out.flush()
}

fn load_board(path: &Path) -> Result<Board, AppError> {
    let json = std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Take the board size from a loaded board, re-checking the result
fn fit_settings_to_board(settings: &mut Settings, board: &Board) -> Result<(), SettingsError> {
    if board.size() != settings.board_size {
        log::warn!(
            "Board file is {}x{}, overriding board_size {}",
            board.size(),
            board.size(),
            settings.board_size
        );
        settings.board_size = board.size();
        settings.validate()?;
    }
    Ok(())
}

fn build_state(args: &Args) -> Result<GameState, AppError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    settings.validate()?;

    match &args.board {
        Some(path) => {
            let board = load_board(path)?;
            fit_settings_to_board(&mut settings, &board)?;
            let seed = settings.seed.unwrap_or_else(rand::random);
            Ok(GameState::from_board(settings, seed, board)?)
        }
        None => Ok(GameState::new(settings)),
    }
}

fn run_autoplay(state: &mut GameState, args: &Args, out: &mut impl Write) -> io::Result<()> {
    emit(out, state, None, &[], args.json)?;
    while state.moves < args.max_moves {
        let Some(direction) = autoplay_direction(state) else {
            break;
        };
        let outcome = step(state, direction);
        emit(out, state, Some(direction), &outcome.events, args.json)?;
    }
    log::info!(
        "Autoplay finished: {} moves, max tile {}",
        state.moves,
        state.max_tile_value()
    );
    Ok(())
}

fn run_interactive(state: &mut GameState, args: &Args, out: &mut impl Write) -> io::Result<()> {
    emit(out, state, None, &[], args.json)?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        match command_for_key(&line) {
            Some(Command::Move(direction)) => {
                let outcome = step(state, direction);
                if outcome.changed || outcome.spawned.is_some() {
                    emit(out, state, Some(direction), &outcome.events, args.json)?;
                }
            }
            Some(Command::Restart) => {
                let seed = state.restart_seed();
                state.restart(seed);
                emit(out, state, None, &[], args.json)?;
            }
            Some(Command::Quit) => break,
            None => log::warn!("Ignoring unknown key {:?}", line.trim()),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Slide Merge starting...");

    let mut state = match build_state(&args) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut out = io::stdout().lock();
    let result = if args.autoplay {
        run_autoplay(&mut state, &args, &mut out)
    } else {
        run_interactive(&mut state, &args, &mut out)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Output failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_merge::consts::MAX_BOARD_SIZE;

    #[test]
    fn test_board_size_override_is_validated() {
        let mut settings = Settings::default();
        let board = Board::empty(MAX_BOARD_SIZE + 1);
        assert!(matches!(
            fit_settings_to_board(&mut settings, &board),
            Err(SettingsError::BoardSize { .. })
        ));

        let mut settings = Settings::default();
        assert!(fit_settings_to_board(&mut settings, &Board::empty(1)).is_err());
    }

    #[test]
    fn test_board_size_override_is_applied() {
        let mut settings = Settings::default();
        fit_settings_to_board(&mut settings, &Board::empty(6)).unwrap();
        assert_eq!(settings.board_size, 6);
    }

    #[test]
    fn test_oversized_board_file_is_rejected() {
        let args = Args::parse_from(["slide-merge", "--seed", "3"]);
        assert!(build_state(&args).is_ok());

        let path = std::env::temp_dir().join(format!("slide-merge-{}.json", std::process::id()));
        let json = format!(r#"{{"size": {}, "tiles": []}}"#, MAX_BOARD_SIZE + 4);
        std::fs::write(&path, json).unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let args = Args::parse_from(["slide-merge", "--board", path_arg.as_str()]);
        let result = build_state(&args);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(AppError::Settings(SettingsError::BoardSize { .. }))));
    }

    #[test]
    fn test_missing_board_file_reports_path() {
        let args = Args::parse_from(["slide-merge", "--board", "/nonexistent/board.json"]);
        let err = build_state(&args).unwrap_err();
        assert!(matches!(err, AppError::Read { .. }));
        assert!(err.to_string().starts_with("/nonexistent/board.json"));
    }
}
