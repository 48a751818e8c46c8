//! Drop timer - converts elapsed host time into automatic drops

use tile_merge_types::DROP_INTERVAL_MS;

/// Fixed-period accumulator.
///
/// Paused sessions simply stop calling [`DropTimer::advance`]; the partial
/// period already accumulated is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTimer {
    interval_ms: u32,
    elapsed_ms: u32,
}

impl DropTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time accumulated toward the next drop
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Restore accumulated time (kept below one period)
    pub fn set_elapsed_ms(&mut self, elapsed_ms: u32) {
        self.elapsed_ms = elapsed_ms % self.interval_ms;
    }

    /// Add elapsed time and return how many whole periods completed
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        let total = self.elapsed_ms.saturating_add(elapsed_ms);
        self.elapsed_ms = total % self.interval_ms;
        total / self.interval_ms
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}

impl Default for DropTimer {
    fn default() -> Self {
        Self::new(DROP_INTERVAL_MS)
    }
}
