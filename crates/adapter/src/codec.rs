//! Codec module - JSON text to and from engine snapshots

use log::warn;
use tile_merge_core::{FallingSnapshot, TileSnapshot};
use tile_merge_engine::StatsTracker;
use tile_merge_types::Variant;

use crate::documents::{FallingSnapshotDoc, SavedSessionDoc, StatsDoc, TileSnapshotDoc};

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown variant: {0}")]
    UnknownVariant(String),
}

/// Snapshot of whichever game a saved session holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedSnapshot {
    Square(TileSnapshot),
    Hex(TileSnapshot),
    Falling(FallingSnapshot),
}

impl SavedSnapshot {
    pub fn variant(&self) -> Variant {
        match self {
            SavedSnapshot::Square(_) => Variant::Square,
            SavedSnapshot::Hex(_) => Variant::Hex,
            SavedSnapshot::Falling(_) => Variant::Falling,
        }
    }
}

/// A game snapshot together with the stats overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub snapshot: SavedSnapshot,
    pub stats: StatsTracker,
}

pub fn encode_tile_snapshot(
    snapshot: &TileSnapshot,
    variant: Variant,
) -> Result<String, CodecError> {
    let doc = TileSnapshotDoc::from_snapshot(snapshot, variant);
    Ok(serde_json::to_string(&doc)?)
}

pub fn decode_tile_snapshot(json: &str) -> Result<TileSnapshot, CodecError> {
    let doc: TileSnapshotDoc = serde_json::from_str(json)?;
    Ok(doc.into_snapshot())
}

pub fn encode_falling_snapshot(snapshot: &FallingSnapshot) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&FallingSnapshotDoc::from_snapshot(snapshot))?)
}

pub fn decode_falling_snapshot(json: &str) -> Result<FallingSnapshot, CodecError> {
    let doc: FallingSnapshotDoc = serde_json::from_str(json)?;
    Ok(doc.into_snapshot())
}

pub fn encode_stats(stats: &StatsTracker) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&StatsDoc::from(stats))?)
}

pub fn decode_stats(json: &str) -> Result<StatsTracker, CodecError> {
    let doc: StatsDoc = serde_json::from_str(json)?;
    Ok(doc.into())
}

pub fn encode_session(session: &SavedSession) -> Result<String, CodecError> {
    let snapshot = match &session.snapshot {
        SavedSnapshot::Square(s) => {
            serde_json::to_value(TileSnapshotDoc::from_snapshot(s, Variant::Square))?
        }
        SavedSnapshot::Hex(s) => {
            serde_json::to_value(TileSnapshotDoc::from_snapshot(s, Variant::Hex))?
        }
        SavedSnapshot::Falling(s) => serde_json::to_value(FallingSnapshotDoc::from_snapshot(s))?,
    };
    let doc = SavedSessionDoc {
        variant: Some(session.snapshot.variant().as_str().to_string()),
        snapshot,
        stats: StatsDoc::from(&session.stats),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Decode a saved session; a missing variant means the square board
pub fn decode_session(json: &str) -> Result<SavedSession, CodecError> {
    let doc: SavedSessionDoc = serde_json::from_str(json)?;
    let variant = match doc.variant.as_deref() {
        None => Variant::Square,
        Some(name) => Variant::from_str(name.trim())
            .ok_or_else(|| CodecError::UnknownVariant(name.to_string()))?,
    };

    let value = if doc.snapshot.is_null() {
        warn!("saved {} session has no snapshot", variant.as_str());
        serde_json::Value::Object(Default::default())
    } else {
        doc.snapshot
    };

    let snapshot = match variant {
        Variant::Square => SavedSnapshot::Square(
            serde_json::from_value::<TileSnapshotDoc>(value)?.into_snapshot(),
        ),
        Variant::Hex => SavedSnapshot::Hex(
            serde_json::from_value::<TileSnapshotDoc>(value)?.into_snapshot(),
        ),
        Variant::Falling => SavedSnapshot::Falling(
            serde_json::from_value::<FallingSnapshotDoc>(value)?.into_snapshot(),
        ),
    };

    Ok(SavedSession {
        snapshot,
        stats: doc.stats.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_merge_core::{FallingGame, PieceSnapshot, Seed, Shift, SquareGame};
    use tile_merge_types::{ShapeKind, SquareDirection};

    #[test]
    fn test_decode_square_rows() {
        let json = r#"{
            "size": 4,
            "seed": "abc",
            "rngSeed": 12345,
            "cachedValue": 2,
            "score": 16,
            "grid": [[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 8, 0], [0, 0, 0, 0]],
            "over": false,
            "won": false,
            "counted": false
        }"#;
        let snapshot = decode_tile_snapshot(json).unwrap();
        assert_eq!(snapshot.size, 4);
        assert_eq!(snapshot.seed, Some(Seed::Text("abc".into())));
        assert_eq!(snapshot.rng_state, Some(12345));
        assert_eq!(snapshot.cached_value, Some(2));
        assert_eq!(snapshot.grid.len(), 16);
        assert_eq!(snapshot.grid[0], 2);
        assert_eq!(snapshot.grid[5], 4);
        assert_eq!(snapshot.grid[10], 8);
        assert_eq!(snapshot.move_count, 0);
    }

    #[test]
    fn test_decode_hex_flat() {
        let json = r#"{"size": 1, "score": 4, "grid": [0, 2, 0, 0, 4, 0, 0], "moveCount": 3}"#;
        let snapshot = decode_tile_snapshot(json).unwrap();
        assert_eq!(snapshot.grid, vec![0, 2, 0, 0, 4, 0, 0]);
        assert_eq!(snapshot.move_count, 3);
        assert_eq!(snapshot.seed, None);
    }

    #[test]
    fn test_numeric_seed_stays_numeric() {
        let snapshot = decode_tile_snapshot(r#"{"seed": 92}"#).unwrap();
        assert_eq!(snapshot.seed, Some(Seed::Number(92)));
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot = decode_tile_snapshot("{}").unwrap();
        assert_eq!(snapshot, TileSnapshot::default());
    }

    #[test]
    fn test_invalid_cached_value_dropped() {
        let snapshot = decode_tile_snapshot(r#"{"cachedValue": 3}"#).unwrap();
        assert_eq!(snapshot.cached_value, None);
    }

    #[test]
    fn test_decode_empties_values_that_are_not_tiles() {
        let json = r#"{"size": 3, "grid": [[3, 2, 0], [0, 7, 4], [1, 0, 0]]}"#;
        let snapshot = decode_tile_snapshot(json).unwrap();
        assert_eq!(snapshot.grid, vec![0, 2, 0, 0, 0, 4, 0, 0, 0]);

        let falling = decode_falling_snapshot(
            r#"{"grid": [6, null, 4],
                "current": {"shapeIndex": 5, "rotation": 9, "row": 0, "col": 3, "value": 7}}"#,
        )
        .unwrap();
        assert_eq!(falling.grid, vec![0, 0, 4]);
        let active = falling.active.unwrap();
        assert_eq!(active.value, 2);
        assert_eq!(active.rotation, 1);
    }

    #[test]
    fn test_high_stored_score_keeps_playing() {
        let snapshot =
            decode_tile_snapshot(r#"{"size": 4, "score": 4294967294, "grid": [2, 2]}"#).unwrap();
        let mut game = SquareGame::from_snapshot(&snapshot);
        let outcome = game.apply_move(SquareDirection::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.score, u32::MAX);
    }

    #[test]
    fn test_piece_stored_outside_well_is_replaced() {
        let snapshot = decode_falling_snapshot(
            r#"{"current": {"shapeIndex": 0, "rotation": 0, "row": 127, "col": 0, "value": 2},
                "next": {"shapeIndex": 1, "value": 4}}"#,
        )
        .unwrap();
        let mut game = FallingGame::from_snapshot(&snapshot);
        let active = game.active().unwrap();
        assert_eq!(active.kind, ShapeKind::J);
        assert_eq!((active.row, active.col), (0, 3));
        assert_eq!(active.value, 4);
        assert_eq!(game.tick(), Shift::Moved);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(decode_tile_snapshot("{"), Err(CodecError::Json(_))));
        assert!(matches!(
            decode_tile_snapshot(r#"{"score": -5}"#),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn test_square_encodes_rows() {
        let snapshot = TileSnapshot {
            size: 3,
            grid: vec![2, 0, 0, 0, 4, 0, 0, 0, 8],
            ..TileSnapshot::default()
        };
        let json = encode_tile_snapshot(&snapshot, Variant::Square).unwrap();
        assert!(json.contains(r#""grid":[[2,0,0],[0,4,0],[0,0,8]]"#));
        assert!(!json.contains("rngSeed"));
        assert_eq!(decode_tile_snapshot(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_hex_encodes_flat() {
        let snapshot = TileSnapshot {
            size: 1,
            grid: vec![0, 2, 0, 0, 4, 0, 0],
            seed: Some(Seed::Number(7)),
            rng_state: Some(99),
            ..TileSnapshot::default()
        };
        let json = encode_tile_snapshot(&snapshot, Variant::Hex).unwrap();
        assert!(json.contains(r#""grid":[0,2,0,0,4,0,0]"#));
        assert!(json.contains(r#""seed":7"#));
        assert_eq!(decode_tile_snapshot(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_decode_falling_with_nulls() {
        let mut rows = vec![vec!["null"; 10]; 16];
        rows[15][0] = "4";
        let grid: Vec<String> = rows
            .iter()
            .map(|r| format!("[{}]", r.join(",")))
            .collect();
        let json = format!(
            r#"{{"grid": [{}], "score": 8, "linesCleared": 1, "paused": true, "over": false,
                "current": {{"shapeIndex": 3, "rotation": 0, "row": 2, "col": 4, "value": 2}},
                "next": {{"shapeIndex": 9, "rotation": 0, "row": 0, "col": 0, "value": 4}}}}"#,
            grid.join(",")
        );
        let snapshot = decode_falling_snapshot(&json).unwrap();
        assert_eq!(snapshot.grid.len(), 160);
        assert_eq!(snapshot.grid[150], 4);
        assert_eq!(snapshot.lines_cleared, 1);
        assert!(snapshot.paused);
        assert_eq!(
            snapshot.active,
            Some(PieceSnapshot {
                kind: ShapeKind::O,
                rotation: 0,
                row: 2,
                col: 4,
                value: 2,
            })
        );
        // Unknown shape index is dropped.
        assert_eq!(snapshot.next, None);
    }

    #[test]
    fn test_falling_encodes_null_rows() {
        let mut grid = vec![0u32; 160];
        grid[159] = 2;
        let snapshot = FallingSnapshot {
            grid,
            score: 2,
            active: Some(PieceSnapshot {
                kind: ShapeKind::T,
                rotation: 1,
                row: 0,
                col: 3,
                value: 4,
            }),
            drop_timer_ms: 120,
            ..FallingSnapshot::default()
        };
        let json = encode_falling_snapshot(&snapshot).unwrap();
        assert!(json.contains("[null,null,null,null,null,null,null,null,null,2]"));
        assert!(json.contains(r#""shapeIndex":5"#));
        assert!(json.contains(r#""dropTimerMs":120"#));
        assert_eq!(decode_falling_snapshot(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_stats_round_trip() {
        let stats = StatsTracker {
            games_played: 5,
            best_score: 1200,
            best_tile: 256,
            streak: 1,
            max_streak: 2,
        };
        let json = encode_stats(&stats).unwrap();
        assert!(json.contains(r#""gamesPlayed":5"#));
        assert_eq!(decode_stats(&json).unwrap(), stats);
        assert_eq!(decode_stats("{}").unwrap(), StatsTracker::default());
    }

    #[test]
    fn test_session_round_trip() {
        let session = SavedSession {
            snapshot: SavedSnapshot::Hex(TileSnapshot {
                size: 2,
                grid: vec![0; 19],
                seed: Some(Seed::Text("daily-2024-01-01".into())),
                ..TileSnapshot::default()
            }),
            stats: StatsTracker {
                games_played: 1,
                ..StatsTracker::default()
            },
        };
        let json = encode_session(&session).unwrap();
        assert_eq!(decode_session(&json).unwrap(), session);
    }

    #[test]
    fn test_session_variant_handling() {
        let square = decode_session(r#"{"snapshot": {"size": 4}}"#).unwrap();
        assert_eq!(square.snapshot.variant(), Variant::Square);

        let falling = decode_session(r#"{"variant": "tetris"}"#).unwrap();
        assert_eq!(falling.snapshot, SavedSnapshot::Falling(FallingSnapshot::default()));

        match decode_session(r#"{"variant": "chess"}"#) {
            Err(CodecError::UnknownVariant(name)) => assert_eq!(name, "chess"),
            other => panic!("expected unknown variant, got {:?}", other),
        }
    }
}
