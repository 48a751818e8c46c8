//! Tile session - one square or hex game plus its undo history
//!
//! The session is the single owner of a game. Every input goes through it so
//! that history, best-score tracking and the one-shot terminal notification
//! stay consistent with the board.

use std::sync::Arc;

use log::debug;
use tile_merge_core::{HexGeometry, Seed, SquareGeometry, TileGame, TileSnapshot, Topology};
use tile_merge_types::{MoveOutcome, TerminalKind};

use crate::history::History;
use crate::stats::{StatsSink, TerminalEvent};

pub type SquareSession<S> = TileSession<SquareGeometry, S>;
pub type HexSession<S> = TileSession<HexGeometry, S>;

/// A slide-and-merge game with bounded undo and stats reporting
#[derive(Debug)]
pub struct TileSession<T: Topology, S: StatsSink> {
    game: TileGame<T>,
    history: History<TileSnapshot>,
    stats: S,
}

impl<T: Topology, S: StatsSink> TileSession<T, S> {
    pub fn new(game: TileGame<T>, stats: S) -> Self {
        let mut session = Self {
            game,
            history: History::new(),
            stats,
        };
        session.report_progress();
        session
    }

    /// Start a session on a fresh board of the given size
    pub fn start(size: u8, seed: Seed, stats: S) -> Self {
        Self::new(TileGame::with_size(size, seed), stats)
    }

    pub fn game(&self) -> &TileGame<T> {
        &self.game
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    pub fn into_stats(self) -> S {
        self.stats
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Value of the next spawned tile (assist display)
    pub fn peek_next_value(&mut self) -> u32 {
        self.game.peek_next_value()
    }

    /// Apply a move; history and stats change only when the board changed
    pub fn handle_move(&mut self, direction: T::Direction) -> MoveOutcome {
        let before = self.game.snapshot();
        let outcome = self.game.apply_move(direction);
        if !outcome.moved {
            return outcome;
        }

        self.history.push(before);
        self.report_progress();

        if outcome.won && self.game.mark_counted() {
            self.report_terminal(TerminalKind::Won);
        }
        if outcome.over && self.game.mark_counted() {
            self.report_terminal(TerminalKind::GameOver);
        }
        outcome
    }

    /// Apply a move given as a direction token
    pub fn handle_named_move(&mut self, token: &str) -> MoveOutcome {
        match T::parse_direction(token) {
            Some(direction) => self.handle_move(direction),
            None => self.game.apply_named_move(token),
        }
    }

    /// Restore the newest history entry; false when there is none
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                self.game.load_snapshot(&snapshot);
                debug!("undo, {} steps left", self.history.len());
                true
            }
            None => false,
        }
    }

    /// Clear the terminal flags and keep playing
    pub fn continue_play(&mut self) {
        self.game.continue_play();
    }

    /// Start a new game on the same geometry
    pub fn new_game(&mut self, seed: Seed) {
        self.game.restart(seed);
        self.history.clear();
        self.report_progress();
    }

    /// Start a new game on a board of another size
    pub fn resize(&mut self, size: u8, seed: Seed) {
        self.game = TileGame::new(Arc::new(T::build(size)), seed);
        self.history.clear();
        self.report_progress();
    }

    pub fn snapshot(&self) -> TileSnapshot {
        self.game.snapshot()
    }

    /// Resume from a stored snapshot; history starts empty
    pub fn restore(&mut self, snapshot: &TileSnapshot) {
        self.game.load_snapshot(snapshot);
        self.history.clear();
    }

    fn report_progress(&mut self) {
        self.stats
            .record_progress(self.game.score(), self.game.max_tile());
    }

    fn report_terminal(&mut self, kind: TerminalKind) {
        let event = TerminalEvent {
            variant: T::VARIANT,
            kind,
            score: self.game.score(),
            max_tile: self.game.max_tile(),
        };
        self.stats.on_terminal(&event);
    }
}
