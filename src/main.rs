//! Headless replay runner (default binary).
//!
//! Starts a seeded game of any variant, replays a move list, optionally undoes
//! the last moves and prints the board, the score and the JSON snapshot.
//! Settings come from `TILE_MERGE_*` environment variables; flags override them.

use anyhow::{bail, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use tile_merge::adapter::{encode_falling_snapshot, encode_tile_snapshot};
use tile_merge::core::{Seed, Topology};
use tile_merge::engine::{
    seeds, FallingSession, HexSession, SessionConfig, SquareSession, StatsTracker, TileSession,
};
use tile_merge::types::{
    Cell, FallingAction, Variant, MAX_HEX_RADIUS, MAX_SQUARE_SIZE, MIN_HEX_RADIUS, MIN_SQUARE_SIZE,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Replay a seeded tile-merge game")]
struct Cli {
    /// square | hex | falling
    #[arg(long)]
    variant: Option<String>,

    /// Square side length or hex radius
    #[arg(long, value_name = "N")]
    size: Option<u8>,

    /// Seed label (hashed, as in share links)
    #[arg(long, conflicts_with = "daily")]
    seed: Option<String>,

    /// Use today's daily challenge seed
    #[arg(long)]
    daily: bool,

    /// Moves: `lurd` letters for square, comma-separated tokens otherwise
    #[arg(long, default_value = "")]
    moves: String,

    /// Undo this many moves after the replay
    #[arg(long, value_name = "N", default_value_t = 0)]
    undo: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = SessionConfig::from_env();
    if let Some(name) = cli.variant.as_deref() {
        match Variant::from_str(name.trim()) {
            Some(variant) => config.variant = variant,
            None => bail!("unknown variant: {}", name),
        }
    }
    if let Some(size) = cli.size {
        match config.variant {
            Variant::Square => config.size = size.clamp(MIN_SQUARE_SIZE, MAX_SQUARE_SIZE),
            Variant::Hex => config.radius = size.clamp(MIN_HEX_RADIUS, MAX_HEX_RADIUS),
            Variant::Falling => warn!("--size has no effect on the falling variant"),
        }
    }
    if cli.seed.is_some() {
        config.seed = cli.seed.clone();
    }

    let seed = if cli.daily {
        seeds::today()
    } else {
        config.resolve_seed()
    };
    info!("{} game, seed {}", config.variant.as_str(), seed);

    let tokens = move_tokens(&cli.moves, config.variant);
    match config.variant {
        Variant::Square => {
            let session = SquareSession::start(config.size, seed, StatsTracker::new());
            run_tiles(session, &tokens, cli.undo, config.assist)
        }
        Variant::Hex => {
            let session = HexSession::start(config.radius, seed, StatsTracker::new());
            run_tiles(session, &tokens, cli.undo, config.assist)
        }
        Variant::Falling => run_falling(&config, seed, &tokens, cli.undo),
    }
}

/// Square moves may be packed as letters (`lurd`); everything else is a token list
fn move_tokens(moves: &str, variant: Variant) -> Vec<String> {
    let separated = moves.contains(',') || moves.contains(char::is_whitespace);
    if variant == Variant::Square && !separated {
        return moves.chars().map(String::from).collect();
    }
    moves
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn run_tiles<T: Topology>(
    mut session: TileSession<T, StatsTracker>,
    tokens: &[String],
    undo: usize,
    assist: bool,
) -> Result<()> {
    for token in tokens {
        if T::parse_direction(token).is_none() {
            bail!("unknown {} move: {}", T::VARIANT.as_str(), token);
        }
        let outcome = session.handle_named_move(token);
        if !outcome.moved {
            info!("move {} changed nothing", token);
        }
    }

    for _ in 0..undo {
        if !session.undo() {
            warn!("undo history exhausted");
            break;
        }
    }

    print!("{}", render_tiles(&session));
    println!("score: {}", session.game().score());
    if session.game().won() {
        println!("won");
    }
    if session.game().over() {
        println!("game over");
    }
    if assist && !session.game().over() {
        println!("next tile: {}", session.peek_next_value());
    }
    println!("{}", encode_tile_snapshot(&session.snapshot(), T::VARIANT)?);
    Ok(())
}

fn run_falling(config: &SessionConfig, seed: Seed, tokens: &[String], undo: usize) -> Result<()> {
    if undo > 0 {
        warn!("undo is not available in the falling variant");
    }
    let mut session = FallingSession::start(seed, config.drop_interval_ms, StatsTracker::new());
    for token in tokens {
        if FallingAction::from_str(token).is_none() {
            bail!("unknown falling action: {}", token);
        }
        if !session.apply_named_action(token) {
            info!("action {} changed nothing", token);
        }
    }

    let game = session.game();
    let well = game.well();
    let active: Vec<(i8, i8)> = game.active().map(|p| p.cells().to_vec()).unwrap_or_default();
    for row in 0..well.rows() as i8 {
        let line: Vec<String> = (0..well.cols() as i8)
            .map(|col| {
                if active.contains(&(row, col)) {
                    return format!("{:>5}", "#");
                }
                format_cell(well.get(row, col).flatten())
            })
            .collect();
        println!("{}", line.join(""));
    }
    println!("score: {}  lines: {}", game.score(), game.lines_cleared());
    if let Some(next) = game.next() {
        println!("next: {} ({})", next.kind.as_str(), next.value);
    }
    if game.over() {
        println!("game over");
    }
    println!("{}", encode_falling_snapshot(&session.snapshot())?);
    Ok(())
}

fn render_tiles<T: Topology>(session: &TileSession<T, StatsTracker>) -> String {
    let game = session.game();
    let grid = game.grid();
    let mut out = String::new();
    match T::VARIANT {
        Variant::Hex => {
            // Cells are enumerated r-major, so each display row is a contiguous run.
            let radius = game.size() as usize;
            let mut start = 0;
            for r in 0..=2 * radius {
                let offset = r.abs_diff(radius);
                let len = 2 * radius + 1 - offset;
                out.push_str(&"   ".repeat(offset));
                for &cell in grid.get(start..start + len).unwrap_or_default() {
                    out.push_str(&format_cell(cell));
                    out.push(' ');
                }
                out.push('\n');
                start += len;
            }
        }
        _ => {
            for row in grid.chunks(game.size() as usize) {
                for &cell in row {
                    out.push_str(&format_cell(cell));
                }
                out.push('\n');
            }
        }
    }
    out
}

fn format_cell(cell: Cell) -> String {
    match cell {
        Some(value) => format!("{:>5}", value),
        None => format!("{:>5}", "."),
    }
}
