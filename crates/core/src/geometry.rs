//! Geometry module - board topologies for the slide-and-merge variants
//!
//! A topology enumerates the valid cells of a board in a fixed order (the
//! order snapshots use) and precomputes, for every direction, the lines a
//! move sweeps. Each line lists cell indices farthest-in-direction first, so
//! compaction toward index 0 is a slide in that direction.
//!
//! Geometries are immutable once built and are shared between games of the
//! same size through `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use arrayvec::ArrayVec;
use log::{debug, warn};

use crate::types::{
    HexDirection, SquareDirection, DEFAULT_HEX_RADIUS, DEFAULT_SQUARE_SIZE, MAX_HEX_RADIUS,
    MAX_LINE_LEN, MAX_SQUARE_SIZE, MIN_HEX_RADIUS, MIN_SQUARE_SIZE, Variant,
};

/// Ordered cell indices swept by one move
pub type Line = ArrayVec<usize, MAX_LINE_LEN>;

/// A board shape the shared move/merge algorithm can run on
pub trait Topology: fmt::Debug {
    type Direction: Copy + fmt::Debug;

    /// Variant this board shape is played as
    const VARIANT: Variant;

    /// Whether the "continue" control also clears the win flag
    const CONTINUE_CLEARS_WON: bool;

    /// Size used when a snapshot does not record one
    const DEFAULT_SIZE: u8;

    /// Build the geometry for a size parameter (side length or radius)
    fn build(size: u8) -> Self
    where
        Self: Sized;

    /// Parse a direction token; unknown tokens yield `None`
    fn parse_direction(token: &str) -> Option<Self::Direction>;

    /// Size parameter this geometry was built with
    fn size(&self) -> u8;

    /// Number of valid cells
    fn cell_count(&self) -> usize;

    /// Lines swept by a move in `direction`; together they partition all cells
    fn lines(&self, direction: Self::Direction) -> &[Line];

    /// Every unordered pair of neighbouring cells, once
    fn adjacent_pairs(&self) -> &[(usize, usize)];
}

fn clamp_size(what: &str, size: u8, min: u8, max: u8) -> u8 {
    let clamped = size.clamp(min, max);
    if clamped != size {
        warn!("{} {} out of range, using {}", what, size, clamped);
    }
    clamped
}

/// Square N×N board, cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareGeometry {
    size: u8,
    lines: [Vec<Line>; 4],
    adjacent: Vec<(usize, usize)>,
}

impl SquareGeometry {
    /// Build a square geometry; sizes outside 3..=8 are clamped
    pub fn new(size: u8) -> Self {
        let size = clamp_size("square size", size, MIN_SQUARE_SIZE, MAX_SQUARE_SIZE);
        let n = size as usize;

        let lines = SquareDirection::ALL.map(|dir| Self::build_lines(n, dir));

        let mut adjacent = Vec::with_capacity(2 * n * (n - 1));
        for row in 0..n {
            for col in 0..n {
                let idx = row * n + col;
                if row + 1 < n {
                    adjacent.push((idx, idx + n));
                }
                if col + 1 < n {
                    adjacent.push((idx, idx + 1));
                }
            }
        }

        debug!("built square geometry {}x{}", size, size);
        Self {
            size,
            lines,
            adjacent,
        }
    }

    /// Lines for one direction: one per row (horizontal moves) or per column
    /// (vertical moves), traversal reversed when the vector component is +1.
    fn build_lines(n: usize, direction: SquareDirection) -> Vec<Line> {
        let (d_row, d_col) = direction.vector();
        let mut positions: ArrayVec<usize, MAX_LINE_LEN> = (0..n).collect();
        if d_row == 1 || d_col == 1 {
            positions.reverse();
        }

        (0..n)
            .map(|fixed| {
                positions
                    .iter()
                    .map(|&p| {
                        if d_row != 0 {
                            p * n + fixed
                        } else {
                            fixed * n + p
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Flat index of (row, col), `None` when out of bounds
    pub fn index(&self, row: i8, col: i8) -> Option<usize> {
        let n = self.size as i8;
        if row < 0 || row >= n || col < 0 || col >= n {
            return None;
        }
        Some(row as usize * n as usize + col as usize)
    }

    /// (row, col) of a flat index
    pub fn coord(&self, index: usize) -> (u8, u8) {
        let n = self.size as usize;
        ((index / n) as u8, (index % n) as u8)
    }
}

impl Topology for SquareGeometry {
    type Direction = SquareDirection;

    const VARIANT: Variant = Variant::Square;
    const CONTINUE_CLEARS_WON: bool = true;
    const DEFAULT_SIZE: u8 = DEFAULT_SQUARE_SIZE;

    fn build(size: u8) -> Self {
        Self::new(size)
    }

    fn parse_direction(token: &str) -> Option<SquareDirection> {
        SquareDirection::from_str(token)
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn cell_count(&self) -> usize {
        self.size as usize * self.size as usize
    }

    fn lines(&self, direction: SquareDirection) -> &[Line] {
        &self.lines[direction.index()]
    }

    fn adjacent_pairs(&self) -> &[(usize, usize)] {
        &self.adjacent
    }
}

/// Axial hex coordinate; the third cube axis is `s = -q - r`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Axial {
    pub q: i8,
    pub r: i8,
}

impl Axial {
    pub fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    pub fn s(&self) -> i8 {
        -self.q - self.r
    }
}

/// Axis a family of parallel hex lines shares
#[derive(Debug, Clone, Copy)]
enum HexAxis {
    Q,
    R,
    S,
}

/// Neighbour offsets; the first three cover each unordered pair once
const HEX_NEIGHBOURS: [(i8, i8); 6] = [(1, 0), (1, -1), (0, 1), (-1, 0), (-1, 1), (0, -1)];

/// Hexagonal board of a given radius
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexGeometry {
    radius: u8,
    cells: Vec<Axial>,
    lines: [Vec<Line>; 6],
    adjacent: Vec<(usize, usize)>,
}

impl HexGeometry {
    /// Build a hex geometry; radii outside 1..=7 are clamped
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_core::{HexGeometry, Topology};
    ///
    /// let geometry = HexGeometry::new(2);
    /// assert_eq!(geometry.cell_count(), 19);
    /// ```
    pub fn new(radius: u8) -> Self {
        let radius = clamp_size("hex radius", radius, MIN_HEX_RADIUS, MAX_HEX_RADIUS);
        let cells = Self::build_cells(radius as i8);
        let index: HashMap<Axial, usize> = cells.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let lines = HexDirection::ALL.map(|dir| Self::build_lines(&cells, dir));

        let mut adjacent = Vec::new();
        for (i, cell) in cells.iter().enumerate() {
            for &(dq, dr) in &HEX_NEIGHBOURS[..3] {
                if let Some(&j) = index.get(&Axial::new(cell.q + dq, cell.r + dr)) {
                    adjacent.push((i, j));
                }
            }
        }

        debug!("built hex geometry radius {} ({} cells)", radius, cells.len());
        Self {
            radius,
            cells,
            lines,
            adjacent,
        }
    }

    /// Cells with |q|, |r|, |s| <= radius, r-major then q ascending
    fn build_cells(radius: i8) -> Vec<Axial> {
        let mut cells = Vec::new();
        for r in -radius..=radius {
            let q_min = (-radius).max(-r - radius);
            let q_max = radius.min(-r + radius);
            for q in q_min..=q_max {
                cells.push(Axial::new(q, r));
            }
        }
        cells
    }

    fn build_lines(cells: &[Axial], direction: HexDirection) -> Vec<Line> {
        // (shared axis, sort key, descending)
        let (axis, by_q, descending) = match direction {
            HexDirection::East => (HexAxis::R, true, true),
            HexDirection::West => (HexAxis::R, true, false),
            HexDirection::NorthEast => (HexAxis::S, true, true),
            HexDirection::SouthWest => (HexAxis::S, true, false),
            HexDirection::NorthWest => (HexAxis::Q, false, false),
            HexDirection::SouthEast => (HexAxis::Q, false, true),
        };

        let mut groups: BTreeMap<i8, Vec<usize>> = BTreeMap::new();
        for (i, cell) in cells.iter().enumerate() {
            let key = match axis {
                HexAxis::Q => cell.q,
                HexAxis::R => cell.r,
                HexAxis::S => cell.s(),
            };
            groups.entry(key).or_default().push(i);
        }

        groups
            .into_values()
            .map(|mut group| {
                group.sort_by_key(|&i| if by_q { cells[i].q } else { cells[i].r });
                if descending {
                    group.reverse();
                }
                group.into_iter().collect()
            })
            .collect()
    }

    pub fn radius(&self) -> u8 {
        self.radius
    }

    /// All cells in enumeration (snapshot) order
    pub fn cells(&self) -> &[Axial] {
        &self.cells
    }

    /// Flat index of an axial coordinate, `None` when off the board
    pub fn index_of(&self, cell: Axial) -> Option<usize> {
        self.cells.iter().position(|&c| c == cell)
    }

    /// All on-board neighbours of a cell
    pub fn neighbours(&self, cell: Axial) -> impl Iterator<Item = usize> + '_ {
        HEX_NEIGHBOURS
            .iter()
            .filter_map(move |&(dq, dr)| self.index_of(Axial::new(cell.q + dq, cell.r + dr)))
    }
}

impl Topology for HexGeometry {
    type Direction = HexDirection;

    const VARIANT: Variant = Variant::Hex;
    const CONTINUE_CLEARS_WON: bool = false;
    const DEFAULT_SIZE: u8 = DEFAULT_HEX_RADIUS;

    fn build(size: u8) -> Self {
        Self::new(size)
    }

    fn parse_direction(token: &str) -> Option<HexDirection> {
        HexDirection::from_str(token)
    }

    fn size(&self) -> u8 {
        self.radius
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn lines(&self, direction: HexDirection) -> &[Line] {
        &self.lines[direction.index()]
    }

    fn adjacent_pairs(&self) -> &[(usize, usize)] {
        &self.adjacent
    }
}
