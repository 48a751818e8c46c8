//! Pieces module - falling-piece shapes and rotation
//!
//! Each shape is four (x, y) cell offsets. Rotation states are derived from the
//! base shape by the quarter-turn `(x, y) -> (y, -x)` followed by shifting the
//! result so its smallest x and y are 0.

use crate::snapshot::{is_tile_value, PieceSnapshot};
use crate::types::ShapeKind;

/// Offset of one cell relative to the piece anchor, as (x, y)
pub type CellOffset = (i8, i8);

/// Shape of a piece - four cell offsets
pub type PieceShape = [CellOffset; 4];

const I_CELLS: PieceShape = [(0, 1), (1, 1), (2, 1), (3, 1)];
const J_CELLS: PieceShape = [(0, 0), (0, 1), (1, 1), (2, 1)];
const L_CELLS: PieceShape = [(2, 0), (0, 1), (1, 1), (2, 1)];
const O_CELLS: PieceShape = [(1, 0), (2, 0), (1, 1), (2, 1)];
const S_CELLS: PieceShape = [(1, 0), (2, 0), (0, 1), (1, 1)];
const T_CELLS: PieceShape = [(1, 0), (0, 1), (1, 1), (2, 1)];
const Z_CELLS: PieceShape = [(0, 0), (1, 0), (1, 1), (2, 1)];

/// Rotation-0 shape of a piece kind
pub fn base_shape(kind: ShapeKind) -> PieceShape {
    match kind {
        ShapeKind::I => I_CELLS,
        ShapeKind::J => J_CELLS,
        ShapeKind::L => L_CELLS,
        ShapeKind::O => O_CELLS,
        ShapeKind::S => S_CELLS,
        ShapeKind::T => T_CELLS,
        ShapeKind::Z => Z_CELLS,
    }
}

/// One quarter turn, normalised to non-negative offsets
pub fn rotate_shape(shape: PieceShape) -> PieceShape {
    let rotated = shape.map(|(x, y)| (y, -x));
    let min_x = rotated.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = rotated.iter().map(|&(_, y)| y).min().unwrap_or(0);
    rotated.map(|(x, y)| (x - min_x, y - min_y))
}

/// Shape for a kind at a rotation state (taken modulo 4)
pub fn get_shape(kind: ShapeKind, rotation: u8) -> PieceShape {
    let mut shape = base_shape(kind);
    for _ in 0..rotation % 4 {
        shape = rotate_shape(shape);
    }
    shape
}

/// Number of columns a shape spans
pub fn shape_width(shape: &PieceShape) -> i8 {
    shape.iter().map(|&(x, _)| x).max().unwrap_or(0) + 1
}

/// A falling piece: shape, rotation, anchor and the single value it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: ShapeKind,
    pub rotation: u8,
    pub row: i8,
    pub col: i8,
    pub value: u32,
}

impl Piece {
    /// A piece at the origin in rotation 0
    pub fn new(kind: ShapeKind, value: u32) -> Self {
        Self {
            kind,
            rotation: 0,
            row: 0,
            col: 0,
            value,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    pub fn width(&self) -> i8 {
        shape_width(&self.shape())
    }

    /// Absolute (row, col) of every cell
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape()
            .map(|(x, y)| (self.row.saturating_add(y), self.col.saturating_add(x)))
    }

    /// Copy moved by (d_row, d_col)
    pub fn shifted(&self, d_row: i8, d_col: i8) -> Self {
        Self {
            row: self.row.saturating_add(d_row),
            col: self.col.saturating_add(d_col),
            ..*self
        }
    }

    /// Copy in the next rotation state, moved by `d_col`
    pub fn rotated(&self, d_col: i8) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            col: self.col.saturating_add(d_col),
            ..*self
        }
    }

    pub fn to_snapshot(&self) -> PieceSnapshot {
        PieceSnapshot {
            kind: self.kind,
            rotation: self.rotation,
            row: self.row,
            col: self.col,
            value: self.value,
        }
    }

    /// Rebuild a stored piece; a value that is not a tile becomes 2
    pub fn from_snapshot(snapshot: &PieceSnapshot) -> Self {
        Self {
            kind: snapshot.kind,
            rotation: snapshot.rotation % 4,
            row: snapshot.row,
            col: snapshot.col,
            value: if is_tile_value(snapshot.value) {
                snapshot.value
            } else {
                2
            },
        }
    }
}
