//! Bounded undo history

use std::collections::VecDeque;

use tile_merge_types::HISTORY_LIMIT;

/// Newest-last stack of snapshots that evicts the oldest entry when full
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    limit: usize,
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        if self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Remove and return the newest entry
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
