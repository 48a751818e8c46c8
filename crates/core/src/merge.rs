//! Merge module - the slide/compact/double rule shared by every variant
//!
//! A line is processed in sweep order: empties are dropped, then each pair of
//! equal neighbours becomes one doubled tile. A tile produced by a merge never
//! merges again in the same pass, so `[2, 2, 4]` becomes `[4, 4]`, not `[8]`.

use arrayvec::ArrayVec;

use crate::types::{Cell, MAX_LINE_LEN, WIN_TILE};

/// What happened to one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineMerge {
    /// Sum of the values created by merges
    pub gained: u32,
    /// Some merge produced a tile of at least [`WIN_TILE`]
    pub reached_win: bool,
    /// Any cell changed value
    pub changed: bool,
}

/// Compact and merge `line` toward index 0, in place.
///
/// # Examples
///
/// ```
/// use tile_merge_core::merge::slide_and_merge;
///
/// let mut line = [Some(2), None, Some(2), Some(4)];
/// let result = slide_and_merge(&mut line);
/// assert_eq!(line, [Some(4), Some(4), None, None]);
/// assert_eq!(result.gained, 4);
/// assert!(result.changed);
/// ```
pub fn slide_and_merge(line: &mut [Cell]) -> LineMerge {
    let compact: ArrayVec<u32, MAX_LINE_LEN> = line.iter().flatten().copied().collect();

    let mut merged: ArrayVec<u32, MAX_LINE_LEN> = ArrayVec::new();
    let mut result = LineMerge::default();
    let mut i = 0;
    while i < compact.len() {
        let value = compact[i];
        // A pair whose double does not fit in a u32 stays apart.
        let pair = value
            .checked_mul(2)
            .filter(|_| compact.get(i + 1) == Some(&value));
        if let Some(doubled) = pair {
            merged.push(doubled);
            result.gained = result.gained.saturating_add(doubled);
            if doubled >= WIN_TILE {
                result.reached_win = true;
            }
            i += 2;
        } else {
            merged.push(value);
            i += 1;
        }
    }

    for (pos, cell) in line.iter_mut().enumerate() {
        let next = merged.get(pos).copied();
        if *cell != next {
            result.changed = true;
            *cell = next;
        }
    }

    result
}
