//! Stats collaborator
//!
//! Sessions push two kinds of notifications: progress after every committed
//! move or lock, and a one-shot terminal event per game. What a sink does
//! with them (persist, display, forward) is up to the host.

use log::info;
use tile_merge_types::{TerminalKind, Variant};

/// One-shot notification of a game reaching a terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalEvent {
    pub variant: Variant,
    pub kind: TerminalKind,
    pub score: u32,
    pub max_tile: u32,
}

/// Receiver for session notifications
pub trait StatsSink {
    /// Called after each committed move or lock
    fn record_progress(&mut self, _score: u32, _max_tile: u32) {}

    /// Called at most once per game
    fn on_terminal(&mut self, event: &TerminalEvent);
}

/// Sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStats;

impl StatsSink for NullStats {
    fn on_terminal(&mut self, _event: &TerminalEvent) {}
}

/// Running totals shown in the stats overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsTracker {
    pub games_played: u32,
    pub best_score: u32,
    pub best_tile: u32,
    pub streak: u32,
    pub max_streak: u32,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsSink for StatsTracker {
    fn record_progress(&mut self, score: u32, max_tile: u32) {
        self.best_score = self.best_score.max(score);
        self.best_tile = self.best_tile.max(max_tile);
    }

    fn on_terminal(&mut self, event: &TerminalEvent) {
        self.games_played = self.games_played.saturating_add(1);
        self.best_score = self.best_score.max(event.score);
        self.best_tile = self.best_tile.max(event.max_tile);
        match event.kind {
            TerminalKind::Won => {
                self.streak = self.streak.saturating_add(1);
                self.max_streak = self.max_streak.max(self.streak);
            }
            TerminalKind::GameOver => self.streak = 0,
        }
        info!(
            "{} game {}: score {}, games played {}, streak {}",
            event.variant.as_str(),
            event.kind.as_str(),
            event.score,
            self.games_played,
            self.streak
        );
    }
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn record_progress(&mut self, score: u32, max_tile: u32) {
        (**self).record_progress(score, max_tile);
    }

    fn on_terminal(&mut self, event: &TerminalEvent) {
        (**self).on_terminal(event);
    }
}
