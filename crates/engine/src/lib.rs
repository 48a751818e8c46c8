//! Session layer - owns games on behalf of a host
//!
//! The core crate is a set of pure state machines. This crate adds what a
//! playable session needs around them:
//!
//! - [`session`]: square/hex sessions with bounded undo and terminal reporting
//! - [`falling`]: falling-piece session driven by elapsed time
//! - [`stats`]: the stats collaborator trait and the overlay tracker
//! - [`seeds`]: random, daily and shared seeds
//! - [`config`]: environment-based session configuration

pub mod config;
pub mod falling;
pub mod history;
pub mod seeds;
pub mod session;
pub mod stats;
pub mod timer;

pub use tile_merge_core as core;
pub use tile_merge_types as types;

pub use config::SessionConfig;
pub use falling::FallingSession;
pub use history::History;
pub use session::{HexSession, SquareSession, TileSession};
pub use stats::{NullStats, StatsSink, StatsTracker, TerminalEvent};
pub use timer::DropTimer;
