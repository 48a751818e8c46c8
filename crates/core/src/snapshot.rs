//! Snapshots - plain copies of engine state for undo and persistence
//!
//! Snapshots are values: taking one never borrows the game, and restoring one
//! never fails. Fields that may be missing in externally stored data are
//! `Option`s so the restore path can substitute defaults.

use crate::rng::Seed;
use crate::types::ShapeKind;

/// Whether a stored value can be a tile: a power of two of at least 2
pub fn is_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// State of a square or hex game
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileSnapshot {
    /// Side length (square) or radius (hex); 0 means "unknown"
    pub size: u8,
    /// Seed the game was created with
    pub seed: Option<Seed>,
    /// Live RNG state; falls back to the seed's initial state when missing
    pub rng_state: Option<u32>,
    /// Peeked-but-unplaced tile value
    pub cached_value: Option<u32>,
    pub score: u32,
    /// Tile values in cell enumeration order, 0 for empty
    pub grid: Vec<u32>,
    pub over: bool,
    pub won: bool,
    pub counted: bool,
    pub move_count: u32,
}

impl TileSnapshot {
    /// Number of non-empty cells
    pub fn tile_count(&self) -> usize {
        self.grid.iter().filter(|&&v| v != 0).count()
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.iter().copied().max().unwrap_or(0)
    }
}

/// A falling piece as stored in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub rotation: u8,
    pub row: i8,
    pub col: i8,
    pub value: u32,
}

/// State of a falling-piece game
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FallingSnapshot {
    /// Well cells row-major (top row first), 0 for empty
    pub grid: Vec<u32>,
    pub score: u32,
    pub lines_cleared: u32,
    pub paused: bool,
    pub over: bool,
    pub counted: bool,
    pub active: Option<PieceSnapshot>,
    pub next: Option<PieceSnapshot>,
    pub seed: Option<Seed>,
    pub rng_state: Option<u32>,
    /// Time accumulated toward the next automatic drop
    pub drop_timer_ms: u32,
}

impl FallingSnapshot {
    pub fn playable(&self) -> bool {
        !self.over && !self.paused
    }
}
