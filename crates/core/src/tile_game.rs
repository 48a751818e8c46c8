//! Tile game module - slide-and-merge state for the square and hex boards
//!
//! One generic engine drives both boards; the [`Topology`] supplies the cell
//! list, the lines swept per direction and the neighbour relation. The game
//! owns its grid, score, terminal flags, the cached next tile value and the
//! seeded RNG. All transitions are synchronous and deterministic.

use std::sync::Arc;

use arrayvec::ArrayVec;
use log::{info, warn};

use crate::geometry::{HexGeometry, SquareGeometry, Topology};
use crate::merge::slide_and_merge;
use crate::rng::{Mulberry32, Seed};
use crate::snapshot::{is_tile_value, TileSnapshot};
use crate::types::{Cell, MoveOutcome, MAX_LINE_LEN};

/// Classic square 2048
pub type SquareGame = TileGame<SquareGeometry>;

/// Hexagonal 2048
pub type HexGame = TileGame<HexGeometry>;

/// Complete slide-and-merge game state
#[derive(Debug, Clone)]
pub struct TileGame<T: Topology> {
    geometry: Arc<T>,
    grid: Vec<Cell>,
    score: u32,
    over: bool,
    won: bool,
    /// Set once this game has been reported to the stats collaborator.
    counted: bool,
    /// Value shown by `peek_next_value`, consumed by the next spawn.
    cached_value: Option<u32>,
    move_count: u32,
    seed: Seed,
    rng: Mulberry32,
}

impl<T: Topology> TileGame<T> {
    /// Create a new game on a shared geometry and spawn the two opening tiles
    pub fn new(geometry: Arc<T>, seed: Seed) -> Self {
        let rng = seed.rng();
        let mut game = Self {
            grid: vec![None; geometry.cell_count()],
            geometry,
            score: 0,
            over: false,
            won: false,
            counted: false,
            cached_value: None,
            move_count: 0,
            seed,
            rng,
        };
        game.reset();
        game
    }

    /// Create a new game building a private geometry of the given size
    pub fn with_size(size: u8, seed: Seed) -> Self {
        Self::new(Arc::new(T::build(size)), seed)
    }

    /// Clear the board and spawn two tiles, continuing the current RNG stream
    pub fn reset(&mut self) {
        self.grid = vec![None; self.geometry.cell_count()];
        self.score = 0;
        self.over = false;
        self.won = false;
        self.counted = false;
        self.cached_value = None;
        self.move_count = 0;
        self.add_random_tile();
        self.add_random_tile();
    }

    /// Reseed and reset
    pub fn restart(&mut self, seed: Seed) {
        self.rng = seed.rng();
        self.seed = seed;
        self.reset();
    }

    pub fn geometry(&self) -> &Arc<T> {
        &self.geometry
    }

    pub fn size(&self) -> u8 {
        self.geometry.size()
    }

    pub fn grid(&self) -> &[Cell] {
        &self.grid
    }

    pub fn get(&self, index: usize) -> Cell {
        self.grid.get(index).copied().flatten()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn over(&self) -> bool {
        self.over
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn counted(&self) -> bool {
        self.counted
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn cached_value(&self) -> Option<u32> {
        self.cached_value
    }

    /// Largest tile on the board (0 when empty)
    pub fn max_tile(&self) -> u32 {
        self.grid.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Mark this game as reported; returns `true` only the first time
    pub fn mark_counted(&mut self) -> bool {
        if self.counted {
            return false;
        }
        self.counted = true;
        true
    }

    /// Clear the terminal flags so play can continue past a win or a stall
    pub fn continue_play(&mut self) {
        self.over = false;
        if T::CONTINUE_CLEARS_WON {
            self.won = false;
        }
    }

    /// Value the next spawned tile will have.
    ///
    /// Draws once and caches; repeated calls return the same value and do not
    /// touch the RNG again until a tile is placed.
    pub fn peek_next_value(&mut self) -> u32 {
        if let Some(value) = self.cached_value {
            return value;
        }
        let value = self.rng.next_tile_value();
        self.cached_value = Some(value);
        value
    }

    fn consume_next_value(&mut self) -> u32 {
        match self.cached_value.take() {
            Some(value) => value,
            None => self.rng.next_tile_value(),
        }
    }

    /// Indices of empty cells in enumeration order
    pub fn available_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.grid
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
    }

    /// Place one tile in a uniformly chosen empty cell.
    /// Returns false (and draws nothing) when the board is full.
    pub fn add_random_tile(&mut self) -> bool {
        let empty = self.available_cells().count();
        if empty == 0 {
            return false;
        }
        let value = self.consume_next_value();
        let pick = self.rng.next_index(empty);
        let chosen = self.available_cells().nth(pick);
        if let Some(idx) = chosen {
            self.grid[idx] = Some(value);
        }
        true
    }

    /// Whether any move could still change the board
    pub fn moves_available(&self) -> bool {
        if self.grid.iter().any(|c| c.is_none()) {
            return true;
        }
        self.geometry
            .adjacent_pairs()
            .iter()
            .any(|&(a, b)| self.grid[a].is_some() && self.grid[a] == self.grid[b])
    }

    fn outcome(&self, moved: bool, gained: u32) -> MoveOutcome {
        MoveOutcome {
            moved,
            gained,
            score: self.score,
            over: self.over,
            won: self.won,
        }
    }

    /// Slide every line toward `direction`, merging equal neighbours.
    ///
    /// When anything moved: the gained points are added, exactly one tile is
    /// spawned and the game-over flag is recomputed. A move after game over,
    /// or one that changes nothing, leaves the state untouched.
    pub fn apply_move(&mut self, direction: T::Direction) -> MoveOutcome {
        if self.over {
            return self.outcome(false, 0);
        }

        let geometry = Arc::clone(&self.geometry);
        let mut moved = false;
        let mut gained: u32 = 0;
        let mut reached_win = false;

        for line in geometry.lines(direction) {
            let mut values: ArrayVec<Cell, MAX_LINE_LEN> =
                line.iter().map(|&idx| self.grid[idx]).collect();
            let result = slide_and_merge(&mut values);
            if result.changed {
                moved = true;
                for (&idx, &value) in line.iter().zip(values.iter()) {
                    self.grid[idx] = value;
                }
            }
            gained = gained.saturating_add(result.gained);
            reached_win |= result.reached_win;
        }

        if !moved {
            return self.outcome(false, 0);
        }

        self.score = self.score.saturating_add(gained);
        if reached_win && !self.won {
            info!("tile game reached the winning tile (score {})", self.score);
            self.won = true;
        }
        self.add_random_tile();
        self.move_count = self.move_count.saturating_add(1);
        if !self.moves_available() {
            info!("tile game over (score {}, max tile {})", self.score, self.max_tile());
            self.over = true;
        }

        self.outcome(true, gained)
    }

    /// Apply a move given as a direction token; unknown tokens are no-ops
    pub fn apply_named_move(&mut self, token: &str) -> MoveOutcome {
        match T::parse_direction(token) {
            Some(direction) => self.apply_move(direction),
            None => self.outcome(false, 0),
        }
    }

    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            size: self.geometry.size(),
            seed: Some(self.seed.clone()),
            rng_state: Some(self.rng.state()),
            cached_value: self.cached_value,
            score: self.score,
            grid: self.grid.iter().map(|c| c.unwrap_or(0)).collect(),
            over: self.over,
            won: self.won,
            counted: self.counted,
            move_count: self.move_count,
        }
    }

    /// Restore a snapshot. Never fails: a different size rebuilds the
    /// geometry, missing cells and values that are not tiles become empty, a
    /// missing RNG state falls back to the seed.
    pub fn load_snapshot(&mut self, snapshot: &TileSnapshot) {
        if snapshot.size != 0 && snapshot.size != self.geometry.size() {
            self.geometry = Arc::new(T::build(snapshot.size));
        }
        if let Some(seed) = &snapshot.seed {
            self.seed = seed.clone();
        }
        let state = snapshot
            .rng_state
            .unwrap_or_else(|| self.seed.initial_state());
        self.rng = Mulberry32::new(state);

        let cells = self.geometry.cell_count();
        if snapshot.grid.len() < cells {
            warn!(
                "snapshot grid has {} of {} cells, filling the rest with empties",
                snapshot.grid.len(),
                cells
            );
        }
        let invalid = snapshot
            .grid
            .iter()
            .take(cells)
            .filter(|&&v| v != 0 && !is_tile_value(v))
            .count();
        if invalid > 0 {
            warn!(
                "snapshot grid has {} cells that are not tile values, emptying them",
                invalid
            );
        }
        self.grid = (0..cells)
            .map(|i| snapshot.grid.get(i).copied().filter(|&v| is_tile_value(v)))
            .collect();

        self.score = snapshot.score;
        self.over = snapshot.over;
        self.won = snapshot.won;
        self.counted = snapshot.counted;
        self.cached_value = snapshot.cached_value;
        self.move_count = snapshot.move_count;
    }

    /// Build a game directly from a snapshot
    pub fn from_snapshot(snapshot: &TileSnapshot) -> Self {
        let size = if snapshot.size == 0 {
            T::DEFAULT_SIZE
        } else {
            snapshot.size
        };
        let seed = snapshot.seed.clone().unwrap_or_default();
        let mut game = Self {
            geometry: Arc::new(T::build(size)),
            grid: Vec::new(),
            score: 0,
            over: false,
            won: false,
            counted: false,
            cached_value: None,
            move_count: 0,
            rng: seed.rng(),
            seed,
        };
        game.load_snapshot(snapshot);
        game
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HexDirection, SquareDirection};

    fn square_from(size: u8, values: &[u32]) -> SquareGame {
        let snapshot = TileSnapshot {
            size,
            seed: Some(Seed::Number(7)),
            rng_state: Some(7),
            grid: values.to_vec(),
            ..TileSnapshot::default()
        };
        SquareGame::from_snapshot(&snapshot)
    }

    #[test]
    fn test_new_game_has_two_tiles() {
        let game = SquareGame::with_size(4, Seed::Number(92));
        let tiles: Vec<u32> = game.grid().iter().flatten().copied().collect();
        assert_eq!(tiles.len(), 2);
        assert_eq!(game.score(), 0);
        assert!(!game.over());
        assert!(!game.won());
    }

    #[test]
    fn test_seed_92_opening_and_left_merge() {
        let mut game = SquareGame::with_size(4, Seed::Number(92));
        assert_eq!(game.get(8), Some(2));
        assert_eq!(game.get(9), Some(2));
        assert_eq!(game.rng_state(), 3_031_296_048);

        let outcome = game.apply_move(SquareDirection::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.gained, 4);
        assert_eq!(outcome.score, 4);
        assert_eq!(game.get(8), Some(4));
        assert_eq!(game.get(11), Some(2));
        assert_eq!(game.grid().iter().flatten().count(), 2);
        assert_eq!(game.rng_state(), 2_399_460_378);
    }

    #[test]
    fn test_noop_move_leaves_state_unchanged() {
        let mut game = square_from(4, &[2, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let before = game.snapshot();
        let outcome = game.apply_move(SquareDirection::Left);
        assert!(!outcome.moved);
        assert_eq!(outcome.gained, 0);
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_move_after_over_is_noop() {
        let mut game = square_from(4, &[2; 16]);
        let mut snapshot = game.snapshot();
        snapshot.over = true;
        game.load_snapshot(&snapshot);

        let outcome = game.apply_move(SquareDirection::Left);
        assert!(!outcome.moved);
        assert!(outcome.over);
        assert_eq!(game.snapshot(), snapshot);
    }

    #[test]
    fn test_unknown_direction_is_noop() {
        let mut game = SquareGame::with_size(4, Seed::Number(3));
        let before = game.snapshot();
        let outcome = game.apply_named_move("sideways");
        assert!(!outcome.moved);
        assert_eq!(game.snapshot(), before);

        // A hex token is not a square direction.
        assert!(!game.apply_named_move("ne").moved);
    }

    #[test]
    fn test_game_over_detection() {
        // Full board, one merge available on the left edge of row 0.
        #[rustfmt::skip]
        let mut game = square_from(4, &[
            2, 2, 4, 8,
            4, 8, 16, 32,
            8, 16, 32, 64,
            16, 32, 64, 128,
        ]);
        assert!(game.moves_available());
        let outcome = game.apply_move(SquareDirection::Right);
        assert!(outcome.moved);
        // Row 0 becomes [_, 4, 4, 8] and a tile spawns in the only gap; 4/4 still merge.
        assert!(!outcome.over);
    }

    #[test]
    fn test_full_board_without_pairs_is_over() {
        #[rustfmt::skip]
        let game = square_from(4, &[
            2, 4, 2, 4,
            4, 2, 4, 2,
            2, 4, 2, 4,
            4, 2, 4, 2,
        ]);
        assert!(!game.moves_available());
    }

    #[test]
    fn test_win_sets_flag_but_not_over() {
        let mut game = square_from(4, &[1024, 1024, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let outcome = game.apply_move(SquareDirection::Left);
        assert!(outcome.won);
        assert!(!outcome.over);
        assert_eq!(game.max_tile(), 2048);

        // Still playable.
        let outcome = game.apply_move(SquareDirection::Right);
        assert!(outcome.moved);
        assert!(outcome.won);
    }

    #[test]
    fn test_continue_play_clears_flags_per_variant() {
        let mut square = square_from(4, &[2; 16]);
        let mut snapshot = square.snapshot();
        snapshot.over = true;
        snapshot.won = true;
        square.load_snapshot(&snapshot);
        square.continue_play();
        assert!(!square.over());
        assert!(!square.won());

        let mut hex = HexGame::with_size(2, Seed::Number(1));
        let mut snapshot = hex.snapshot();
        snapshot.over = true;
        snapshot.won = true;
        hex.load_snapshot(&snapshot);
        hex.continue_play();
        assert!(!hex.over());
        assert!(hex.won());
    }

    #[test]
    fn test_peek_is_stable_until_placed() {
        let mut game = SquareGame::with_size(4, Seed::Number(11));
        let first = game.peek_next_value();
        let state = game.rng_state();
        for _ in 0..5 {
            assert_eq!(game.peek_next_value(), first);
        }
        assert_eq!(game.rng_state(), state);

        // Place a tile: the cached value is consumed.
        assert!(game.add_random_tile());
        assert_eq!(game.cached_value(), None);
    }

    #[test]
    fn test_peek_does_not_change_outcomes() {
        let mut peeking = SquareGame::with_size(4, Seed::Number(5));
        let mut plain = SquareGame::with_size(4, Seed::Number(5));
        for dir in [
            SquareDirection::Left,
            SquareDirection::Up,
            SquareDirection::Right,
            SquareDirection::Down,
        ]
        .iter()
        .cycle()
        .take(40)
        {
            peeking.peek_next_value();
            let a = peeking.apply_move(*dir);
            let b = plain.apply_move(*dir);
            assert_eq!(a, b);
            assert_eq!(peeking.grid(), plain.grid());
        }
    }

    #[test]
    fn test_mark_counted_once() {
        let mut game = SquareGame::with_size(4, Seed::Number(1));
        assert!(game.mark_counted());
        assert!(!game.mark_counted());
        assert!(game.snapshot().counted);
    }

    #[test]
    fn test_score_saturates_at_max() {
        let mut grid = vec![0u32; 16];
        grid[0] = 2;
        grid[1] = 2;
        let mut game = SquareGame::from_snapshot(&TileSnapshot {
            size: 4,
            score: u32::MAX - 1,
            grid,
            seed: Some(Seed::Number(7)),
            ..TileSnapshot::default()
        });

        let outcome = game.apply_move(SquareDirection::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.gained, 4);
        assert_eq!(outcome.score, u32::MAX);
        assert_eq!(game.get(0), Some(4));
    }

    #[test]
    fn test_largest_tiles_do_not_merge() {
        let top = 1 << 31;
        let mut game = square_from(4, &[top, top, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert!(!game.apply_move(SquareDirection::Left).moved);

        let outcome = game.apply_move(SquareDirection::Right);
        assert!(outcome.moved);
        assert_eq!(outcome.gained, 0);
        assert_eq!(game.get(2), Some(top));
        assert_eq!(game.get(3), Some(top));
    }

    #[test]
    fn test_restore_empties_values_that_are_not_tiles() {
        let game = square_from(3, &[3, 2, 1, 6, 0, 0, 0, 0, 1 << 30]);
        assert_eq!(&game.grid()[..4], &[None, Some(2), None, None]);
        assert_eq!(game.get(8), Some(1 << 30));

        let hex = HexGame::from_snapshot(&TileSnapshot {
            size: 1,
            grid: vec![0, 5, 4, 0, 0, 0, 12],
            ..TileSnapshot::default()
        });
        assert_eq!(hex.grid().iter().flatten().copied().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_short_snapshot_defaults_to_empty() {
        let snapshot = TileSnapshot {
            size: 4,
            grid: vec![2, 4],
            ..TileSnapshot::default()
        };
        let game = SquareGame::from_snapshot(&snapshot);
        assert_eq!(game.grid().len(), 16);
        assert_eq!(game.get(0), Some(2));
        assert_eq!(game.get(1), Some(4));
        assert!(game.grid()[2..].iter().all(|c| c.is_none()));
        assert_eq!(game.score(), 0);
        // Missing seed and RNG state fall back to the default seed.
        assert_eq!(game.rng_state(), Seed::default().initial_state());
    }

    #[test]
    fn test_snapshot_with_other_size_rebuilds_geometry() {
        let mut game = SquareGame::with_size(4, Seed::Number(1));
        let other = SquareGame::with_size(5, Seed::Number(2));
        game.load_snapshot(&other.snapshot());
        assert_eq!(game.size(), 5);
        assert_eq!(game.grid().len(), 25);
        assert_eq!(game.snapshot(), other.snapshot());
    }

    #[test]
    fn test_hex_merge_along_east() {
        let geometry = Arc::new(HexGeometry::new(2));
        let mut game = HexGame::new(Arc::clone(&geometry), Seed::Number(1));
        let mut snapshot = game.snapshot();
        snapshot.grid = vec![0; 19];
        // Row r = 0 holds q = -2..=2 at indices 7..=11.
        snapshot.grid[7] = 2;
        snapshot.grid[8] = 2;
        game.load_snapshot(&snapshot);

        let outcome = game.apply_move(HexDirection::East);
        assert!(outcome.moved);
        assert_eq!(outcome.gained, 4);
        assert_eq!(game.get(11), Some(4));
        assert_eq!(game.grid().iter().flatten().count(), 2);
    }

    #[test]
    fn test_geometry_is_shared() {
        let geometry = Arc::new(HexGeometry::new(3));
        let a = HexGame::new(Arc::clone(&geometry), Seed::Number(1));
        let b = HexGame::new(Arc::clone(&geometry), Seed::Number(2));
        assert!(Arc::ptr_eq(a.geometry(), b.geometry()));
    }
}
