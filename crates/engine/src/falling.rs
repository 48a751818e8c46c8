//! Falling session - drives a falling-piece game from host time
//!
//! The host calls [`FallingSession::advance`] with elapsed milliseconds from
//! whatever loop it runs. The session turns that into automatic one-row drops
//! through a [`DropTimer`] and reports locks and the game over to its stats sink.

use tile_merge_core::{FallingGame, FallingSnapshot, Seed};
use tile_merge_types::{FallingAction, TerminalKind, Variant};

use crate::stats::{StatsSink, TerminalEvent};
use crate::timer::DropTimer;

#[derive(Debug)]
pub struct FallingSession<S: StatsSink> {
    game: FallingGame,
    timer: DropTimer,
    stats: S,
}

impl<S: StatsSink> FallingSession<S> {
    pub fn new(game: FallingGame, interval_ms: u32, stats: S) -> Self {
        Self {
            game,
            timer: DropTimer::new(interval_ms),
            stats,
        }
    }

    pub fn start(seed: Seed, interval_ms: u32, stats: S) -> Self {
        Self::new(FallingGame::new(seed), interval_ms, stats)
    }

    pub fn game(&self) -> &FallingGame {
        &self.game
    }

    pub fn timer(&self) -> &DropTimer {
        &self.timer
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn into_stats(self) -> S {
        self.stats
    }

    /// Feed elapsed time; returns the number of automatic drops performed.
    /// Time does not accumulate while paused or over.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.game.playable() {
            return 0;
        }
        let due = self.timer.advance(elapsed_ms);
        let mut dropped = 0;
        for _ in 0..due {
            if !self.game.playable() {
                break;
            }
            self.game.tick();
            dropped += 1;
            self.after_step();
        }
        dropped
    }

    pub fn apply_action(&mut self, action: FallingAction) -> bool {
        let changed = self.game.apply_action(action);
        if action == FallingAction::Restart {
            self.timer.reset();
        }
        self.after_step();
        changed
    }

    /// Apply an action token; unknown tokens are ignored
    pub fn apply_named_action(&mut self, token: &str) -> bool {
        match FallingAction::from_str(token) {
            Some(action) => self.apply_action(action),
            None => false,
        }
    }

    /// Suspend or resume; the partial drop period is kept
    pub fn toggle_pause(&mut self) -> bool {
        self.game.toggle_pause()
    }

    pub fn new_game(&mut self, seed: Seed) {
        self.game.restart(seed);
        self.timer.reset();
    }

    pub fn snapshot(&self) -> FallingSnapshot {
        FallingSnapshot {
            drop_timer_ms: self.timer.elapsed_ms(),
            ..self.game.snapshot()
        }
    }

    pub fn restore(&mut self, snapshot: &FallingSnapshot) {
        self.game.load_snapshot(snapshot);
        self.timer.set_elapsed_ms(snapshot.drop_timer_ms);
    }

    fn after_step(&mut self) {
        if self.game.take_last_lock().is_some() {
            self.stats
                .record_progress(self.game.score(), self.game.max_tile());
        }
        if self.game.over() && self.game.mark_counted() {
            let event = TerminalEvent {
                variant: Variant::Falling,
                kind: TerminalKind::GameOver,
                score: self.game.score(),
                max_tile: self.game.max_tile(),
            };
            self.stats.on_terminal(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsTracker;
    use tile_merge_core::PieceSnapshot;
    use tile_merge_types::{ShapeKind, DROP_INTERVAL_MS};

    fn session(seed: u32) -> FallingSession<StatsTracker> {
        FallingSession::start(Seed::Number(seed), DROP_INTERVAL_MS, StatsTracker::new())
    }

    fn active_row(session: &FallingSession<StatsTracker>) -> i8 {
        session.game().active().map(|p| p.row).unwrap_or(-1)
    }

    #[test]
    fn test_advance_drops_once_per_interval() {
        let mut s = session(4);
        assert_eq!(s.advance(DROP_INTERVAL_MS - 1), 0);
        assert_eq!(active_row(&s), 0);
        assert_eq!(s.advance(1), 1);
        assert_eq!(active_row(&s), 1);
        assert_eq!(s.advance(DROP_INTERVAL_MS * 2), 2);
        assert_eq!(active_row(&s), 3);
    }

    #[test]
    fn test_pause_suspends_without_losing_progress() {
        let mut s = session(4);
        s.advance(500);
        assert!(s.toggle_pause());
        let before = s.snapshot();
        assert_eq!(s.advance(10_000), 0);
        assert_eq!(s.snapshot(), before);
        assert_eq!(before.drop_timer_ms, 500);

        assert!(s.toggle_pause());
        assert_eq!(s.advance(200), 1);
        assert_eq!(active_row(&s), 1);
    }

    #[test]
    fn test_locks_reported_as_progress() {
        let mut s = session(8);
        assert!(s.apply_action(FallingAction::HardDrop));
        assert!(s.stats().best_tile >= 2);
        assert_eq!(s.stats().best_score, s.game().score());
    }

    #[test]
    fn test_game_over_reported_once() {
        // Columns 3..=6 are stacked to the top with tiles that never merge.
        let mut grid = vec![0u32; 160];
        for row in 0..16usize {
            for col in 3..7usize {
                grid[row * 10 + col] = if row % 2 == 0 { 8 } else { 16 };
            }
        }
        let mut s = session(2);
        s.restore(&FallingSnapshot {
            grid,
            active: Some(PieceSnapshot {
                kind: ShapeKind::O,
                rotation: 0,
                row: 14,
                col: -1,
                value: 2,
            }),
            seed: Some(Seed::Number(2)),
            ..FallingSnapshot::default()
        });

        assert!(s.apply_action(FallingAction::HardDrop));
        assert!(s.game().over());
        assert_eq!(s.stats().games_played, 1);

        // Further input changes nothing and reports nothing.
        assert!(!s.apply_action(FallingAction::HardDrop));
        assert_eq!(s.advance(5_000), 0);
        assert_eq!(s.stats().games_played, 1);

        // A restart is a new game that can be reported again.
        assert!(s.apply_action(FallingAction::Restart));
        assert!(!s.game().over());
        assert!(!s.game().counted());
    }

    #[test]
    fn test_snapshot_carries_timer() {
        let mut s = session(6);
        s.advance(300);
        let snapshot = s.snapshot();
        assert_eq!(snapshot.drop_timer_ms, 300);

        let mut other = session(99);
        other.restore(&snapshot);
        assert_eq!(other.snapshot(), snapshot);
        assert_eq!(other.advance(400), 1);
    }
}
