//! Tile merge (workspace facade crate).
//!
//! Re-exports the member crates under `tile_merge::{types,core,engine,adapter}` so
//! hosts and integration tests depend on one package.

pub use tile_merge_adapter as adapter;
pub use tile_merge_core as core;
pub use tile_merge_engine as engine;
pub use tile_merge_types as types;
