//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used by every game variant.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, session glue, persistence documents).
//!
//! # Board Dimensions
//!
//! | Variant | Default | Supported |
//! |---------|---------|-----------|
//! | Square  | 4×4 | 3..=8 per side |
//! | Hex     | radius 2 (19 cells) | radius 1..=7 |
//! | Falling | 16 rows × 10 columns | fixed |
//!
//! # Tile Values
//!
//! - New tiles are `2` with probability [`TWO_PROBABILITY`], otherwise `4`
//! - Reaching [`WIN_TILE`] sets the win flag but never ends the game
//!
//! # Examples
//!
//! ```
//! use tile_merge_types::{HexDirection, SquareDirection, ShapeKind, FallingAction};
//!
//! assert_eq!(SquareDirection::from_str("Left"), Some(SquareDirection::Left));
//! assert_eq!(HexDirection::from_str("ne"), Some(HexDirection::NorthEast));
//! assert_eq!(ShapeKind::from_index(3), Some(ShapeKind::O));
//! assert_eq!(FallingAction::from_str("hardDrop"), Some(FallingAction::HardDrop));
//! ```

/// Tile value that flags a win (2048)
pub const WIN_TILE: u32 = 2048;

/// Probability that a freshly drawn tile is a 2 (otherwise 4)
pub const TWO_PROBABILITY: f64 = 0.9;

/// Undo history depth; older snapshots are evicted first
pub const HISTORY_LIMIT: usize = 5;

/// Longest line any geometry can produce (falling-piece column height)
pub const MAX_LINE_LEN: usize = 16;

/// Default square board size
pub const DEFAULT_SQUARE_SIZE: u8 = 4;

/// Smallest supported square board
pub const MIN_SQUARE_SIZE: u8 = 3;

/// Largest supported square board
pub const MAX_SQUARE_SIZE: u8 = 8;

/// Default hex board radius
pub const DEFAULT_HEX_RADIUS: u8 = 2;

/// Smallest supported hex radius
pub const MIN_HEX_RADIUS: u8 = 1;

/// Largest supported hex radius (diameter 15 fits in a line)
pub const MAX_HEX_RADIUS: u8 = 7;

/// Falling-piece well height in cells
pub const WELL_ROWS: u8 = 16;

/// Falling-piece well width in cells
pub const WELL_COLS: u8 = 10;

/// Automatic drop period for the falling piece (milliseconds)
pub const DROP_INTERVAL_MS: u32 = 700;

/// Points awarded per cleared row
pub const LINE_CLEAR_BONUS: u32 = 100;

/// Column offsets tried, in order, when an in-place rotation does not fit
pub const WALL_KICKS: [i8; 4] = [-1, 1, -2, 2];

/// A cell on any board
///
/// - `None`: Empty cell
/// - `Some(value)`: Cell holding a tile of the given power-of-two value
pub type Cell = Option<u32>;

/// Board variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Square,
    Hex,
    Falling,
}

impl Variant {
    /// Parse variant from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "square" | "classic" => Some(Variant::Square),
            "hex" => Some(Variant::Hex),
            "falling" | "tetris" => Some(Variant::Falling),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Square => "square",
            Variant::Hex => "hex",
            Variant::Falling => "falling",
        }
    }
}

/// The four slide directions of the square board
///
/// Each direction carries a unit vector `(d_row, d_col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SquareDirection {
    pub const ALL: [SquareDirection; 4] = [
        SquareDirection::Up,
        SquareDirection::Down,
        SquareDirection::Left,
        SquareDirection::Right,
    ];

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r"
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_types::SquareDirection;
    ///
    /// assert_eq!(SquareDirection::from_str("u"), Some(SquareDirection::Up));
    /// assert_eq!(SquareDirection::from_str("RIGHT"), Some(SquareDirection::Right));
    /// assert_eq!(SquareDirection::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(SquareDirection::Up),
            "down" | "d" => Some(SquareDirection::Down),
            "left" | "l" => Some(SquareDirection::Left),
            "right" | "r" => Some(SquareDirection::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SquareDirection::Up => "up",
            SquareDirection::Down => "down",
            SquareDirection::Left => "left",
            SquareDirection::Right => "right",
        }
    }

    /// Unit vector as `(d_row, d_col)`
    pub fn vector(&self) -> (i8, i8) {
        match self {
            SquareDirection::Up => (-1, 0),
            SquareDirection::Down => (1, 0),
            SquareDirection::Left => (0, -1),
            SquareDirection::Right => (0, 1),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SquareDirection::Up => 0,
            SquareDirection::Down => 1,
            SquareDirection::Left => 2,
            SquareDirection::Right => 3,
        }
    }
}

/// The six slide directions of the hex board (axial coordinates)
///
/// Opposite pairs: East/West, NorthEast/SouthWest, NorthWest/SouthEast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexDirection {
    East,
    West,
    NorthEast,
    SouthWest,
    NorthWest,
    SouthEast,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::West,
        HexDirection::NorthEast,
        HexDirection::SouthWest,
        HexDirection::NorthWest,
        HexDirection::SouthEast,
    ];

    /// Parse direction from its compass token ("e", "w", "ne", "sw", "nw", "se")
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_types::HexDirection;
    ///
    /// assert_eq!(HexDirection::from_str("SE"), Some(HexDirection::SouthEast));
    /// assert_eq!(HexDirection::from_str("n"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "e" | "east" => Some(HexDirection::East),
            "w" | "west" => Some(HexDirection::West),
            "ne" | "northeast" => Some(HexDirection::NorthEast),
            "sw" | "southwest" => Some(HexDirection::SouthWest),
            "nw" | "northwest" => Some(HexDirection::NorthWest),
            "se" | "southeast" => Some(HexDirection::SouthEast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HexDirection::East => "e",
            HexDirection::West => "w",
            HexDirection::NorthEast => "ne",
            HexDirection::SouthWest => "sw",
            HexDirection::NorthWest => "nw",
            HexDirection::SouthEast => "se",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            HexDirection::East => HexDirection::West,
            HexDirection::West => HexDirection::East,
            HexDirection::NorthEast => HexDirection::SouthWest,
            HexDirection::SouthWest => HexDirection::NorthEast,
            HexDirection::NorthWest => HexDirection::SouthEast,
            HexDirection::SouthEast => HexDirection::NorthWest,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            HexDirection::East => 0,
            HexDirection::West => 1,
            HexDirection::NorthEast => 2,
            HexDirection::SouthWest => 3,
            HexDirection::NorthWest => 4,
            HexDirection::SouthEast => 5,
        }
    }
}

/// The seven falling-piece shapes, in generation order
///
/// The index of a shape (0..7) is what the RNG draws, so the order is part
/// of the determinism contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::Z,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            ShapeKind::I => 0,
            ShapeKind::J => 1,
            ShapeKind::L => 2,
            ShapeKind::O => 3,
            ShapeKind::S => 4,
            ShapeKind::T => 5,
            ShapeKind::Z => 6,
        }
    }

    /// Parse shape kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            "o" => Some(ShapeKind::O),
            "s" => Some(ShapeKind::S),
            "t" => Some(ShapeKind::T),
            "z" => Some(ShapeKind::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "I",
            ShapeKind::J => "J",
            ShapeKind::L => "L",
            ShapeKind::O => "O",
            ShapeKind::S => "S",
            ShapeKind::T => "T",
            ShapeKind::Z => "Z",
        }
    }
}

/// Actions accepted by the falling-piece game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallingAction {
    /// Shift piece one column left
    MoveLeft,
    /// Shift piece one column right
    MoveRight,
    /// Shift piece one row down (locks if blocked)
    SoftDrop,
    /// Drop piece as far as it goes, then lock
    HardDrop,
    /// Rotate piece 90° with column wall kicks
    Rotate,
    /// Toggle pause state
    Pause,
    /// Start a fresh game
    Restart,
}

impl FallingAction {
    /// Parse action from string (case-insensitive camelCase)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(FallingAction::MoveLeft),
            "moveright" | "right" => Some(FallingAction::MoveRight),
            "softdrop" | "down" => Some(FallingAction::SoftDrop),
            "harddrop" | "drop" => Some(FallingAction::HardDrop),
            "rotate" => Some(FallingAction::Rotate),
            "pause" => Some(FallingAction::Pause),
            "restart" => Some(FallingAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FallingAction::MoveLeft => "moveLeft",
            FallingAction::MoveRight => "moveRight",
            FallingAction::SoftDrop => "softDrop",
            FallingAction::HardDrop => "hardDrop",
            FallingAction::Rotate => "rotate",
            FallingAction::Pause => "pause",
            FallingAction::Restart => "restart",
        }
    }
}

/// Result of a slide move on the square or hex board
///
/// A plain value; the game keeps no reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Whether any cell changed (and a new tile was spawned)
    pub moved: bool,
    /// Points earned from merges in this move
    pub gained: u32,
    /// Total score after the move
    pub score: u32,
    /// No empty cell and no equal neighbours remain
    pub over: bool,
    /// A tile of at least [`WIN_TILE`] exists (sticky until continued)
    pub won: bool,
}

/// Terminal transition reported once per game to the stats collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    Won,
    GameOver,
}

impl TerminalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalKind::Won => "won",
            TerminalKind::GameOver => "over",
        }
    }
}
