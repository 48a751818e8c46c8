//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state transitions for the three
//! tile-merge variants. It has **zero dependencies** on UI, storage, or I/O:
//!
//! - **Deterministic**: Same seed and same inputs produce identical games
//! - **Testable**: Every rule is exercised by unit tests next to the code
//! - **Portable**: Runs headless, in a terminal, or behind any host loop
//! - **Fast**: Line sweeps and well settling use fixed-capacity buffers
//!
//! # Module Structure
//!
//! - [`rng`]: mulberry32 generator, FNV-1a seed hashing, [`Seed`]
//! - [`geometry`]: square and hex boards as cell lists plus per-direction lines
//! - [`merge`]: the compact-and-double rule shared by every variant
//! - [`tile_game`]: slide-and-merge game generic over a [`Topology`]
//! - [`well`], [`pieces`], [`falling`]: the falling-piece variant
//! - [`snapshot`]: plain state copies for undo and persistence
//!
//! # Game Rules
//!
//! - **Spawns**: a new tile is 2 with probability 0.9, else 4; the value is drawn
//!   before the position, and a peeked value is kept until it is placed
//! - **Merges**: equal neighbours double once per move, farthest tiles first
//! - **Win**: reaching 2048 sets a sticky flag but play continues
//! - **Over**: no empty cell and no equal neighbours
//! - **Falling pieces**: a locked piece settles per column with merging, then
//!   full rows clear for 100 points each
//!
//! # Example
//!
//! ```
//! use tile_merge_core::{Seed, SquareGame};
//! use tile_merge_types::SquareDirection;
//!
//! let mut game = SquareGame::with_size(4, Seed::Number(92));
//! let outcome = game.apply_move(SquareDirection::Left);
//!
//! assert!(outcome.moved);
//! assert_eq!(outcome.gained, 4);
//! assert_eq!(game.score(), 4);
//! ```

pub mod falling;
pub mod geometry;
pub mod merge;
pub mod pieces;
pub mod rng;
pub mod snapshot;
pub mod tile_game;
pub mod well;

pub use tile_merge_types as types;

// Re-export commonly used types for convenience
pub use falling::{FallingGame, LockEvent, Shift};
pub use geometry::{Axial, HexGeometry, Line, SquareGeometry, Topology};
pub use merge::{slide_and_merge, LineMerge};
pub use pieces::{get_shape, Piece};
pub use rng::{hash_seed, Mulberry32, Seed};
pub use snapshot::{is_tile_value, FallingSnapshot, PieceSnapshot, TileSnapshot};
pub use tile_game::{HexGame, SquareGame, TileGame};
pub use well::Well;
