//! Persistence adapter - JSON documents for snapshots, stats and sessions
//!
//! The engine never touches storage. Hosts that keep state between runs go
//! through this crate, which reads and writes the same document shapes the
//! browser clients store, so a saved game can move between the two.
//!
//! ```
//! use tile_merge_adapter::{decode_tile_snapshot, encode_tile_snapshot};
//! use tile_merge_core::{Seed, SquareGame};
//! use tile_merge_types::Variant;
//!
//! let game = SquareGame::with_size(4, Seed::Number(92));
//! let json = encode_tile_snapshot(&game.snapshot(), Variant::Square).unwrap();
//! let restored = SquareGame::from_snapshot(&decode_tile_snapshot(&json).unwrap());
//! assert_eq!(restored.grid(), game.grid());
//! ```

pub mod codec;
pub mod documents;

pub use codec::{
    decode_falling_snapshot, decode_session, decode_stats, decode_tile_snapshot,
    encode_falling_snapshot, encode_session, encode_stats, encode_tile_snapshot, CodecError,
    SavedSession, SavedSnapshot,
};
pub use documents::{
    FallingSnapshotDoc, GridDoc, GridLayout, PieceDoc, SavedSessionDoc, SeedDoc, StatsDoc,
    TileSnapshotDoc,
};
