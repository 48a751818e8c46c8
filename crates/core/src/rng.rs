//! RNG module - seeded tile generation
//!
//! Implements the mulberry32 generator used by every browser client, so a seed
//! reproduces the same board on every platform. Text seeds (daily challenges,
//! share links) are folded into the 32-bit state with FNV-1a.
//!
//! Also provides the next-tile-value draw shared by all variants.

use std::fmt;

use crate::types::TWO_PROBABILITY;

/// FNV-1a offset basis (32-bit)
const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a prime (32-bit)
const FNV_PRIME: u32 = 16_777_619;

/// mulberry32 state increment
const MULBERRY_INCREMENT: u32 = 0x6d2b_79f5;

/// Hash a seed label into an initial 32-bit RNG state (FNV-1a).
///
/// Iterates UTF-16 code units so non-ASCII labels hash the same way the
/// browser clients hash them; for ASCII this is the byte sequence.
pub fn hash_seed(label: &str) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for unit in label.encode_utf16() {
        h ^= unit as u32;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// mulberry32 RNG (multiply-xorshift over a 32-bit counter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a new RNG from a raw state
    pub fn new(state: u32) -> Self {
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Generate next float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Pick an index in [0, len) the way the clients do: `floor(next() * len)`
    pub fn next_index(&mut self, len: usize) -> usize {
        let idx = (self.next_f64() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }

    /// Draw a fresh tile value: 2 with probability 0.9, else 4
    pub fn next_tile_value(&mut self) -> u32 {
        if self.next_f64() < TWO_PROBABILITY {
            2
        } else {
            4
        }
    }

    /// Current state (persisted in snapshots)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Seed supplied at construction (share link, daily challenge, or random)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Seed {
    Number(u32),
    Text(String),
}

impl Seed {
    /// Initial RNG state for this seed.
    ///
    /// Labels are always hashed, even when they look numeric, so a share
    /// link opens the same board as in the browser clients.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_core::Seed;
    ///
    /// assert_eq!(Seed::Number(42).initial_state(), 42);
    /// assert_eq!(Seed::from("daily-2024-01-01").initial_state(), 3_046_110_149);
    /// assert_ne!(Seed::from("42").initial_state(), 42);
    /// ```
    pub fn initial_state(&self) -> u32 {
        match self {
            Seed::Number(n) => *n,
            Seed::Text(label) => hash_seed(label),
        }
    }

    pub fn rng(&self) -> Mulberry32 {
        Mulberry32::new(self.initial_state())
    }
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Number(1)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Number(n) => write!(f, "{}", n),
            Seed::Text(label) => f.write_str(label),
        }
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Seed::Number(value)
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Seed::Text(value.to_string())
    }
}
