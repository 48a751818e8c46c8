//! Falling game module - the falling-piece merge variant
//!
//! Pieces fall one row per timer tick into a 16x10 well. Every piece carries a
//! single tile value stamped into each of its cells when it locks. A lock runs:
//!
//! 1. Stamp the piece into the well
//! 2. Column gravity with bottom-up merging (points are added to the score)
//! 3. Full-row clearing (+100 per row, empty rows enter at the top)
//! 4. Spawn the next piece; a spawn that does not fit ends the game
//!
//! Time is not tracked here. A host (see the session driver) calls
//! [`FallingGame::tick`] whenever its drop timer fires.

use log::{debug, info, warn};

use crate::pieces::Piece;
use crate::rng::{Mulberry32, Seed};
use crate::snapshot::{is_tile_value, FallingSnapshot};
use crate::types::{FallingAction, ShapeKind, LINE_CLEAR_BONUS, WALL_KICKS, WELL_COLS};
use crate::well::Well;

/// Result of a single shift request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// The piece moved
    Moved,
    /// A blocked one-row down shift locked the piece instead
    Locked,
    /// Nothing changed
    Blocked,
}

/// What the most recent lock did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockEvent {
    /// Points created by column merges
    pub merged: u32,
    /// Number of full rows removed
    pub rows_cleared: u32,
    /// The spawn after this lock did not fit
    pub topped_out: bool,
}

/// Complete falling-piece game state
#[derive(Debug, Clone)]
pub struct FallingGame {
    well: Well,
    active: Option<Piece>,
    next: Option<Piece>,
    score: u32,
    lines_cleared: u32,
    paused: bool,
    over: bool,
    counted: bool,
    seed: Seed,
    rng: Mulberry32,
    last_lock: Option<LockEvent>,
}

impl FallingGame {
    /// Create a new game and spawn the first piece
    pub fn new(seed: Seed) -> Self {
        let rng = seed.rng();
        let mut game = Self {
            well: Well::new(),
            active: None,
            next: None,
            score: 0,
            lines_cleared: 0,
            paused: false,
            over: false,
            counted: false,
            seed,
            rng,
            last_lock: None,
        };
        game.reset();
        game
    }

    /// Empty the well and start over, continuing the current RNG stream
    pub fn reset(&mut self) {
        self.well.clear();
        self.score = 0;
        self.lines_cleared = 0;
        self.paused = false;
        self.over = false;
        self.counted = false;
        self.active = None;
        self.last_lock = None;
        self.next = Some(self.create_piece());
        self.spawn_piece();
    }

    /// Reseed and reset
    pub fn restart(&mut self, seed: Seed) {
        self.rng = seed.rng();
        self.seed = seed;
        self.reset();
    }

    pub fn well(&self) -> &Well {
        &self.well
    }

    #[cfg(test)]
    pub(crate) fn well_mut(&mut self) -> &mut Well {
        &mut self.well
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next(&self) -> Option<Piece> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn over(&self) -> bool {
        self.over
    }

    pub fn counted(&self) -> bool {
        self.counted
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Accepts movement input
    pub fn playable(&self) -> bool {
        !self.over && !self.paused
    }

    pub fn max_tile(&self) -> u32 {
        self.well.max_tile()
    }

    /// Mark this game as reported; returns `true` only the first time
    pub fn mark_counted(&mut self) -> bool {
        if self.counted {
            return false;
        }
        self.counted = true;
        true
    }

    /// Take and clear the last lock event
    pub fn take_last_lock(&mut self) -> Option<LockEvent> {
        self.last_lock.take()
    }

    /// Draw shape first, then value
    fn create_piece(&mut self) -> Piece {
        let index = self.rng.next_index(ShapeKind::ALL.len());
        let kind = ShapeKind::from_index(index).unwrap_or(ShapeKind::I);
        let value = self.rng.next_tile_value();
        Piece::new(kind, value)
    }

    fn can_place(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(row, col)| self.well.is_open(row, col))
    }

    /// Promote the queued piece and queue a fresh one.
    /// Returns false (and ends the game) when the new piece does not fit.
    pub fn spawn_piece(&mut self) -> bool {
        let queued = match self.next.take() {
            Some(piece) => piece,
            None => self.create_piece(),
        };
        self.next = Some(self.create_piece());

        let mut piece = Piece::new(queued.kind, queued.value);
        piece.col = (WELL_COLS as i8 - piece.width()) / 2;
        self.active = Some(piece);

        if !self.can_place(&piece) {
            info!(
                "falling game over (score {}, lines {})",
                self.score, self.lines_cleared
            );
            self.over = true;
            return false;
        }
        true
    }

    /// Move the active piece by (d_row, d_col).
    ///
    /// A blocked shift of exactly one row down is a lock event.
    pub fn attempt_shift(&mut self, d_row: i8, d_col: i8) -> Shift {
        if !self.playable() {
            return Shift::Blocked;
        }
        let Some(active) = self.active else {
            return Shift::Blocked;
        };

        let moved = active.shifted(d_row, d_col);
        if self.can_place(&moved) {
            self.active = Some(moved);
            return Shift::Moved;
        }

        if d_row == 1 && d_col == 0 {
            self.lock();
            return Shift::Locked;
        }
        Shift::Blocked
    }

    /// Rotate a quarter turn, trying column kicks when the piece does not fit
    pub fn attempt_rotate(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let candidate = std::iter::once(0)
            .chain(WALL_KICKS)
            .map(|offset| active.rotated(offset))
            .find(|piece| self.can_place(piece));

        match candidate {
            Some(piece) => {
                self.active = Some(piece);
                true
            }
            None => false,
        }
    }

    /// Drop as far as possible and lock. Returns rows fallen.
    pub fn hard_drop(&mut self) -> u8 {
        if !self.playable() {
            return 0;
        }
        let Some(mut piece) = self.active else {
            return 0;
        };

        let mut fallen = 0;
        while self.can_place(&piece.shifted(1, 0)) {
            piece = piece.shifted(1, 0);
            fallen += 1;
        }
        self.active = Some(piece);
        self.lock();
        fallen
    }

    /// Stamp the active piece, settle columns, clear rows and spawn
    pub fn lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        for (row, col) in piece.cells() {
            self.well.set(row, col, Some(piece.value));
        }

        let merged = self.well.settle_columns();
        self.score = self.score.saturating_add(merged);

        let cleared = self.well.clear_full_rows();
        let rows_cleared = cleared.len() as u32;
        if rows_cleared > 0 {
            self.lines_cleared = self.lines_cleared.saturating_add(rows_cleared);
            self.score = self
                .score
                .saturating_add(rows_cleared.saturating_mul(LINE_CLEAR_BONUS));
        }
        debug!(
            "locked {} piece: merged {}, cleared {} rows",
            piece.kind.as_str(),
            merged,
            rows_cleared
        );

        let topped_out = !self.spawn_piece();
        self.last_lock = Some(LockEvent {
            merged,
            rows_cleared,
            topped_out,
        });
    }

    /// One automatic drop step; ignored while paused or over
    pub fn tick(&mut self) -> Shift {
        self.attempt_shift(1, 0)
    }

    /// Suspend or resume. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        if self.over {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Apply a player action; returns whether state changed
    pub fn apply_action(&mut self, action: FallingAction) -> bool {
        match action {
            FallingAction::MoveLeft => self.attempt_shift(0, -1) != Shift::Blocked,
            FallingAction::MoveRight => self.attempt_shift(0, 1) != Shift::Blocked,
            FallingAction::SoftDrop => self.attempt_shift(1, 0) != Shift::Blocked,
            FallingAction::HardDrop => {
                if !self.playable() || self.active.is_none() {
                    return false;
                }
                self.hard_drop();
                true
            }
            FallingAction::Rotate => self.attempt_rotate(),
            FallingAction::Pause => self.toggle_pause(),
            FallingAction::Restart => {
                self.reset();
                true
            }
        }
    }

    /// Apply an action token; unknown tokens are ignored
    pub fn apply_named_action(&mut self, token: &str) -> bool {
        match FallingAction::from_str(token) {
            Some(action) => self.apply_action(action),
            None => false,
        }
    }

    /// Snapshot of the game; `drop_timer_ms` is left at 0 for the host to fill
    pub fn snapshot(&self) -> FallingSnapshot {
        FallingSnapshot {
            grid: self.well.values(),
            score: self.score,
            lines_cleared: self.lines_cleared,
            paused: self.paused,
            over: self.over,
            counted: self.counted,
            active: self.active.map(|p| p.to_snapshot()),
            next: self.next.map(|p| p.to_snapshot()),
            seed: Some(self.seed.clone()),
            rng_state: Some(self.rng.state()),
            drop_timer_ms: 0,
        }
    }

    /// Restore a snapshot. Never fails: missing cells and values that are not
    /// tiles are empty, a missing next piece is generated, an active piece
    /// reaching outside the well is discarded, and a running game without an
    /// active piece spawns one.
    pub fn load_snapshot(&mut self, snapshot: &FallingSnapshot) {
        if let Some(seed) = &snapshot.seed {
            self.seed = seed.clone();
        }
        let state = snapshot
            .rng_state
            .unwrap_or_else(|| self.seed.initial_state());
        self.rng = Mulberry32::new(state);

        let invalid = snapshot
            .grid
            .iter()
            .filter(|&&v| v != 0 && !is_tile_value(v))
            .count();
        if invalid > 0 {
            warn!(
                "snapshot well has {} cells that are not tile values, emptying them",
                invalid
            );
        }
        self.well = Well::from_values(&snapshot.grid);
        self.score = snapshot.score;
        self.lines_cleared = snapshot.lines_cleared;
        self.paused = snapshot.paused;
        self.over = snapshot.over;
        self.counted = snapshot.counted;
        self.last_lock = None;
        self.active = snapshot
            .active
            .as_ref()
            .map(Piece::from_snapshot)
            .filter(|piece| {
                let inside = piece
                    .cells()
                    .iter()
                    .all(|&(row, col)| self.well.get(row, col).is_some());
                if !inside {
                    warn!(
                        "discarding stored piece at ({}, {}) outside the well",
                        piece.row, piece.col
                    );
                }
                inside
            });
        self.next = match &snapshot.next {
            Some(next) => Some(Piece::from_snapshot(next)),
            None => Some(self.create_piece()),
        };

        if self.active.is_none() && !self.over {
            debug!("restored falling game has no active piece, spawning");
            self.spawn_piece();
        }
    }

    /// Build a game directly from a snapshot
    pub fn from_snapshot(snapshot: &FallingSnapshot) -> Self {
        let seed = snapshot.seed.clone().unwrap_or_default();
        let mut game = Self {
            well: Well::new(),
            active: None,
            next: None,
            score: 0,
            lines_cleared: 0,
            paused: false,
            over: false,
            counted: false,
            rng: seed.rng(),
            seed,
            last_lock: None,
        };
        game.load_snapshot(snapshot);
        game
    }
}

impl Default for FallingGame {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}
