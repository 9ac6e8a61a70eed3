//! Ponens CLI - headless autoplay harness.
//!
//! Starts a board from the resolved configuration, then repeatedly plays the
//! first listed pair and prints the board after every move:
//!
//! ```text
//! main() -> PonensConfig::resolve() -> Game::new() -> autoplay() -> stdout
//! ```
//!
//! Environment:
//! - `PONENS_MODE`, `PONENS_SEED`, `PONENS_STRICT`: override the config file
//!   (`PONENS_SEED=random` draws a fresh seed and logs it)
//! - `PONENS_MOVES`: moves to play (default 20)
//! - `PONENS_CHAOS=1`: every third move first tries an invalid pair
//! - `RUST_LOG`: tracing filter (default `info`), logs go to stderr

use std::env;
use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ponens_config::{Overrides, PonensConfig};
use ponens_engine::{Board, Game, LineId, MatchResult, is_valid_pair};

const DEFAULT_MOVES: usize = 20;
const MOVES_VAR: &str = "PONENS_MOVES";
const CHAOS_VAR: &str = "PONENS_CHAOS";
const CHAOS_EVERY: usize = 3;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[derive(Debug, Clone, Copy)]
struct Autoplay {
    moves: usize,
    chaos: bool,
}

impl Autoplay {
    fn from_env() -> Self {
        let moves = match env::var(MOVES_VAR) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring unparseable {MOVES_VAR}: {raw}");
                DEFAULT_MOVES
            }),
            Err(_) => DEFAULT_MOVES,
        };
        let chaos = env::var(CHAOS_VAR).is_ok_and(|value| value.trim() == "1");
        Self { moves, chaos }
    }
}

fn main() -> Result<()> {
    init_tracing();

    // Read and parse failures are already logged; fall back to defaults.
    let config = PonensConfig::load().ok().flatten().unwrap_or_default();
    let overrides = Overrides::from_env();
    let settings = config
        .resolve(&overrides)
        .context("invalid game configuration")?;
    let mode = config.mode_name(&overrides).unwrap_or("easy").to_owned();
    let autoplay = Autoplay::from_env();

    let mut out = io::stdout().lock();
    writeln!(
        out,
        "mode {mode}, seed {}, {} lines, {} pairs minimum",
        settings.seed,
        settings.profile.target_size(),
        settings.min_pairs
    )?;

    let mut game = Game::new(settings);
    print_board(&mut out, game.board())?;
    run(&mut out, &mut game, autoplay)?;

    writeln!(out, "score {}, streak {}", game.score(), game.streak())?;
    Ok(())
}

fn run(out: &mut impl Write, game: &mut Game, autoplay: Autoplay) -> Result<()> {
    let step = {
        let timing = game.settings().timing;
        timing.lock.max(timing.reject)
    };
    let mut clock = Instant::now();

    for turn in 1..=autoplay.moves {
        if !game.has_moves() {
            writeln!(out, "no moves left")?;
            break;
        }

        if autoplay.chaos
            && turn % CHAOS_EVERY == 0
            && let Some((first, second)) = invalid_pair(game.board())
        {
            clock += step;
            game.select(&first, clock);
            let outcome = game.select(&second, clock);
            writeln!(out, "move {turn}: {first} + {second} -> {:?}", outcome.result)?;
        }

        let Some((fact, implication)) = game
            .pairs()
            .first()
            .map(|pair| (pair.fact.id().clone(), pair.implication.id().clone()))
        else {
            break;
        };

        clock += step;
        game.select(&fact, clock);
        let outcome = game.select(&implication, clock);
        writeln!(
            out,
            "move {turn}: {fact} + {implication} -> {:?}",
            outcome.result
        )?;
        if outcome.result != MatchResult::Valid {
            continue;
        }
        if let Some(resolution) = &outcome.resolution {
            for stop in &resolution.replenish.exhausted {
                writeln!(out, "  {stop}")?;
            }
        }
        print_board(out, game.board())?;
    }
    Ok(())
}

/// The first two lines, in board order, that do not form a pair.
fn invalid_pair(board: &Board) -> Option<(LineId, LineId)> {
    let lines = board.lines();
    lines.iter().enumerate().find_map(|(idx, a)| {
        lines[idx + 1..]
            .iter()
            .find(|b| !is_valid_pair(a, b))
            .map(|b| (a.id().clone(), b.id().clone()))
    })
}

fn print_board(out: &mut impl Write, board: &Board) -> io::Result<()> {
    for line in board {
        writeln!(
            out,
            "  {:>5}  {:<8} {}",
            line.id().as_str(),
            line.kind().as_str(),
            line
        )?;
    }
    Ok(())
}
