//! Well module - the falling-piece grid
//!
//! A fixed 16x10 well stored as a flat row-major array.
//! Coordinates: (row, col) where row 0 is the top and col 0 the left wall.
//!
//! Besides placement checks the well implements the two settle steps run after
//! every lock: per-column gravity with merging, then full-row clearing.

use arrayvec::ArrayVec;

use crate::merge::slide_and_merge;
use crate::snapshot::is_tile_value;
use crate::types::{Cell, WELL_COLS, WELL_ROWS};

/// Total number of cells in the well
pub const WELL_SIZE: usize = (WELL_ROWS as usize) * (WELL_COLS as usize);

/// The well - 16 rows x 10 columns using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Well {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; WELL_SIZE],
}

impl Well {
    /// Create a new empty well
    pub fn new() -> Self {
        Self {
            cells: [None; WELL_SIZE],
        }
    }

    /// Build a well from row-major values (0 = empty); missing cells and
    /// values that are not tiles are empty
    pub fn from_values(values: &[u32]) -> Self {
        let mut well = Self::new();
        for (cell, &value) in well.cells.iter_mut().zip(values) {
            *cell = is_tile_value(value).then_some(value);
        }
        well
    }

    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= WELL_ROWS as i8 || col < 0 || col >= WELL_COLS as i8 {
            return None;
        }
        Some((row as usize) * (WELL_COLS as usize) + (col as usize))
    }

    pub fn rows(&self) -> u8 {
        WELL_ROWS
    }

    pub fn cols(&self) -> u8 {
        WELL_COLS
    }

    /// Get cell at (row, col); `None` when out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col); returns false when out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_open(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> &[Cell] {
        let width = WELL_COLS as usize;
        let start = row.min(WELL_ROWS as usize - 1) * width;
        &self.cells[start..start + width]
    }

    /// Row-major values, 0 for empty
    pub fn values(&self) -> Vec<u32> {
        self.cells.iter().map(|c| c.unwrap_or(0)).collect()
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= WELL_ROWS as usize {
            return false;
        }
        self.row(row).iter().all(|cell| cell.is_some())
    }

    /// Largest tile in the well (0 when empty)
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Pull every column to the floor, merging equal neighbours bottom-up.
    ///
    /// Columns never interact; a merged tile does not merge again in the same
    /// pass. Returns the points created by merges.
    pub fn settle_columns(&mut self) -> u32 {
        let rows = WELL_ROWS as i8;
        let mut gained: u32 = 0;
        for col in 0..WELL_COLS as i8 {
            let mut column: ArrayVec<Cell, { WELL_ROWS as usize }> = (0..rows)
                .rev()
                .map(|row| self.get(row, col).flatten())
                .collect();
            let result = slide_and_merge(&mut column);
            gained = gained.saturating_add(result.gained);
            if result.changed {
                for (offset, &cell) in column.iter().enumerate() {
                    self.set(rows - 1 - offset as i8, col, cell);
                }
            }
        }
        gained
    }

    /// Remove all full rows, shifting the rows above down and inserting empty
    /// rows at the top. Returns the cleared row indices, bottom to top.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, { WELL_ROWS as usize }> {
        let mut cleared = ArrayVec::new();
        let width = WELL_COLS as usize;
        let mut write_row = WELL_ROWS as usize;

        for read_row in (0..WELL_ROWS as usize).rev() {
            if self.is_row_full(read_row) {
                cleared.push(read_row);
            } else {
                write_row -= 1;
                if write_row != read_row {
                    self.cells
                        .copy_within(read_row * width..(read_row + 1) * width, write_row * width);
                }
            }
        }

        for cell in &mut self.cells[..write_row * width] {
            *cell = None;
        }

        cleared
    }

    pub fn clear(&mut self) {
        self.cells = [None; WELL_SIZE];
    }
}

impl Default for Well {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTTOM: i8 = WELL_ROWS as i8 - 1;

    fn fill_row_alternating(well: &mut Well, row: i8) {
        for col in 0..WELL_COLS as i8 {
            let value = if col % 2 == 0 { 8 } else { 16 };
            well.set(row, col, Some(value));
        }
    }

    #[test]
    fn test_new_well_is_empty() {
        let well = Well::new();
        assert_eq!(well.cells().len(), 160);
        assert!(well.cells().iter().all(|c| c.is_none()));
        assert_eq!(well.max_tile(), 0);
    }

    #[test]
    fn test_bounds() {
        let mut well = Well::new();
        assert!(well.is_open(0, 0));
        assert!(!well.is_open(-1, 0));
        assert!(!well.is_open(0, WELL_COLS as i8));
        assert!(!well.is_open(WELL_ROWS as i8, 0));
        assert!(!well.set(16, 0, Some(2)));
        assert!(well.set(BOTTOM, 9, Some(2)));
        assert!(!well.is_open(BOTTOM, 9));
    }

    #[test]
    fn test_settle_pulls_tiles_down() {
        let mut well = Well::new();
        well.set(3, 2, Some(4));
        let gained = well.settle_columns();
        assert_eq!(gained, 0);
        assert_eq!(well.get(BOTTOM, 2), Some(Some(4)));
        assert_eq!(well.get(3, 2), Some(None));
    }

    #[test]
    fn test_settle_merges_bottom_up_once() {
        let mut well = Well::new();
        // Column 0 from the floor: 2, 2, 4
        well.set(BOTTOM, 0, Some(2));
        well.set(BOTTOM - 1, 0, Some(2));
        well.set(BOTTOM - 2, 0, Some(4));
        let gained = well.settle_columns();
        assert_eq!(gained, 4);
        assert_eq!(well.get(BOTTOM, 0), Some(Some(4)));
        assert_eq!(well.get(BOTTOM - 1, 0), Some(Some(4)));
        assert_eq!(well.get(BOTTOM - 2, 0), Some(None));
    }

    #[test]
    fn test_settle_has_no_horizontal_interaction() {
        let mut well = Well::new();
        well.set(BOTTOM, 0, Some(2));
        well.set(BOTTOM, 1, Some(2));
        assert_eq!(well.settle_columns(), 0);
        assert_eq!(well.get(BOTTOM, 0), Some(Some(2)));
        assert_eq!(well.get(BOTTOM, 1), Some(Some(2)));
    }

    #[test]
    fn test_clear_full_bottom_row_shifts_rest_down() {
        let mut well = Well::new();
        fill_row_alternating(&mut well, BOTTOM);
        well.set(BOTTOM - 1, 4, Some(2));
        well.set(BOTTOM - 2, 4, Some(32));

        let cleared = well.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[15]);
        assert_eq!(well.get(BOTTOM, 4), Some(Some(2)));
        assert_eq!(well.get(BOTTOM - 1, 4), Some(Some(32)));
        assert!(well.row(0).iter().all(|c| c.is_none()));
        assert_eq!(well.cells().iter().flatten().count(), 2);
    }

    #[test]
    fn test_clear_multiple_rows() {
        let mut well = Well::new();
        fill_row_alternating(&mut well, BOTTOM);
        fill_row_alternating(&mut well, BOTTOM - 2);
        well.set(BOTTOM - 1, 0, Some(64));

        let cleared = well.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[15, 13]);
        assert_eq!(well.get(BOTTOM, 0), Some(Some(64)));
        assert_eq!(well.cells().iter().flatten().count(), 1);
    }

    #[test]
    fn test_from_values_short_input() {
        let well = Well::from_values(&[2, 0, 4]);
        assert_eq!(well.get(0, 0), Some(Some(2)));
        assert_eq!(well.get(0, 1), Some(None));
        assert_eq!(well.get(0, 2), Some(Some(4)));
        assert_eq!(well.cells().iter().flatten().count(), 2);
        assert_eq!(well.values().len(), WELL_SIZE);
    }
}
