//! Documents module - JSON shapes of stored state
//!
//! Field names follow the documents the browser clients keep in local storage
//! (`rngSeed`, `cachedValue`, `linesCleared`, ...). Every field is optional on
//! input; missing values default to zero, false or empty.
//!
//! # Grids
//!
//! The square board is stored as rows, the hex board as one flat list in cell
//! enumeration order, and the falling-piece well as rows with `null` for empty
//! cells. On input all three shapes are accepted and flattened.

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use log::warn;
use tile_merge_core::{is_tile_value, FallingSnapshot, PieceSnapshot, Seed, TileSnapshot};
use tile_merge_engine::StatsTracker;
use tile_merge_types::{ShapeKind, Variant, WELL_COLS};

/// Empty every stored cell that does not hold a tile value
fn tile_cells(mut values: Vec<u32>) -> Vec<u32> {
    let invalid = values
        .iter()
        .filter(|&&v| v != 0 && !is_tile_value(v))
        .count();
    if invalid > 0 {
        warn!("dropping {} stored cells that are not tile values", invalid);
        for value in values.iter_mut().filter(|v| !is_tile_value(**v)) {
            *value = 0;
        }
    }
    values
}

/// Seed as stored: a JSON number or a string label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedDoc {
    Number(u32),
    Text(String),
}

impl From<&Seed> for SeedDoc {
    fn from(seed: &Seed) -> Self {
        match seed {
            Seed::Number(n) => SeedDoc::Number(*n),
            Seed::Text(label) => SeedDoc::Text(label.clone()),
        }
    }
}

impl From<SeedDoc> for Seed {
    fn from(doc: SeedDoc) -> Self {
        match doc {
            SeedDoc::Number(n) => Seed::Number(n),
            SeedDoc::Text(label) => Seed::Text(label),
        }
    }
}

/// How a grid is laid out in JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridLayout {
    #[default]
    Flat,
    Rows {
        width: usize,
        empty_as_null: bool,
    },
}

/// Cell values in enumeration order, 0 for empty
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridDoc {
    pub values: Vec<u32>,
    pub layout: GridLayout,
}

impl GridDoc {
    pub fn flat(values: Vec<u32>) -> Self {
        Self {
            values,
            layout: GridLayout::Flat,
        }
    }

    pub fn rows(values: Vec<u32>, width: usize, empty_as_null: bool) -> Self {
        Self {
            values,
            layout: GridLayout::Rows {
                width: width.max(1),
                empty_as_null,
            },
        }
    }
}

impl Serialize for GridDoc {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.layout {
            GridLayout::Flat => self.values.serialize(serializer),
            GridLayout::Rows {
                width,
                empty_as_null,
            } => {
                let chunks = self.values.chunks(width);
                let mut seq = serializer.serialize_seq(Some(chunks.len()))?;
                for chunk in chunks {
                    if empty_as_null {
                        let row: Vec<Option<u32>> =
                            chunk.iter().map(|&v| (v != 0).then_some(v)).collect();
                        seq.serialize_element(&row)?;
                    } else {
                        seq.serialize_element(chunk)?;
                    }
                }
                seq.end()
            }
        }
    }
}

/// One element of a stored grid: a cell or a whole row
#[derive(Deserialize)]
#[serde(untagged)]
enum GridEntry {
    Cell(Option<u32>),
    Row(Vec<Option<u32>>),
}

impl<'de> Deserialize<'de> for GridDoc {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = GridDoc;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a list of cell values or a list of rows")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(GridDoc::default())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values = Vec::new();
                let mut width = None;
                let mut saw_null = false;
                while let Some(entry) = seq.next_element::<GridEntry>()? {
                    match entry {
                        GridEntry::Cell(cell) => {
                            saw_null |= cell.is_none();
                            values.push(cell.unwrap_or(0));
                        }
                        GridEntry::Row(row) => {
                            width.get_or_insert(row.len());
                            saw_null |= row.iter().any(Option::is_none);
                            values.extend(row.into_iter().map(|c| c.unwrap_or(0)));
                        }
                    }
                }
                Ok(match width {
                    Some(width) => GridDoc::rows(values, width, saw_null),
                    None => GridDoc::flat(values),
                })
            }
        }

        deserializer.deserialize_any(V)
    }
}

/// Stored square or hex game
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileSnapshotDoc {
    pub size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<SeedDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_value: Option<u32>,
    pub score: u32,
    pub grid: GridDoc,
    pub over: bool,
    pub won: bool,
    pub counted: bool,
    pub move_count: u32,
}

impl TileSnapshotDoc {
    /// Document for a snapshot; square boards are written as rows
    pub fn from_snapshot(snapshot: &TileSnapshot, variant: Variant) -> Self {
        let grid = match variant {
            Variant::Square => GridDoc::rows(snapshot.grid.clone(), snapshot.size as usize, false),
            _ => GridDoc::flat(snapshot.grid.clone()),
        };
        Self {
            size: snapshot.size,
            seed: snapshot.seed.as_ref().map(SeedDoc::from),
            rng_seed: snapshot.rng_state,
            cached_value: snapshot.cached_value,
            score: snapshot.score,
            grid,
            over: snapshot.over,
            won: snapshot.won,
            counted: snapshot.counted,
            move_count: snapshot.move_count,
        }
    }

    pub fn into_snapshot(self) -> TileSnapshot {
        let cached_value = self.cached_value.filter(|v| matches!(v, 2 | 4));
        if cached_value != self.cached_value {
            warn!("dropping invalid cached tile value {:?}", self.cached_value);
        }
        TileSnapshot {
            size: self.size,
            seed: self.seed.map(Seed::from),
            rng_state: self.rng_seed,
            cached_value,
            score: self.score,
            grid: tile_cells(self.grid.values),
            over: self.over,
            won: self.won,
            counted: self.counted,
            move_count: self.move_count,
        }
    }
}

/// Stored falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PieceDoc {
    pub shape_index: usize,
    pub rotation: u8,
    pub row: i8,
    pub col: i8,
    pub value: u32,
}

impl PieceDoc {
    pub fn from_snapshot(piece: &PieceSnapshot) -> Self {
        Self {
            shape_index: piece.kind.index(),
            rotation: piece.rotation,
            row: piece.row,
            col: piece.col,
            value: piece.value,
        }
    }

    /// `None` when the shape index is unknown
    pub fn into_snapshot(self) -> Option<PieceSnapshot> {
        let Some(kind) = ShapeKind::from_index(self.shape_index) else {
            warn!("dropping piece with unknown shape index {}", self.shape_index);
            return None;
        };
        let value = if is_tile_value(self.value) {
            self.value
        } else {
            warn!("stored piece value {} is not a tile, using 2", self.value);
            2
        };
        Some(PieceSnapshot {
            kind,
            rotation: self.rotation % 4,
            row: self.row,
            col: self.col,
            value,
        })
    }
}

/// Stored falling-piece game
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FallingSnapshotDoc {
    pub grid: GridDoc,
    pub score: u32,
    pub lines_cleared: u32,
    pub paused: bool,
    pub over: bool,
    pub counted: bool,
    pub current: Option<PieceDoc>,
    pub next: Option<PieceDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<SeedDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u32>,
    pub drop_timer_ms: u32,
}

impl FallingSnapshotDoc {
    pub fn from_snapshot(snapshot: &FallingSnapshot) -> Self {
        Self {
            grid: GridDoc::rows(snapshot.grid.clone(), WELL_COLS as usize, true),
            score: snapshot.score,
            lines_cleared: snapshot.lines_cleared,
            paused: snapshot.paused,
            over: snapshot.over,
            counted: snapshot.counted,
            current: snapshot.active.as_ref().map(PieceDoc::from_snapshot),
            next: snapshot.next.as_ref().map(PieceDoc::from_snapshot),
            seed: snapshot.seed.as_ref().map(SeedDoc::from),
            rng_seed: snapshot.rng_state,
            drop_timer_ms: snapshot.drop_timer_ms,
        }
    }

    pub fn into_snapshot(self) -> FallingSnapshot {
        FallingSnapshot {
            grid: tile_cells(self.grid.values),
            score: self.score,
            lines_cleared: self.lines_cleared,
            paused: self.paused,
            over: self.over,
            counted: self.counted,
            active: self.current.and_then(PieceDoc::into_snapshot),
            next: self.next.and_then(PieceDoc::into_snapshot),
            seed: self.seed.map(Seed::from),
            rng_state: self.rng_seed,
            drop_timer_ms: self.drop_timer_ms,
        }
    }
}

/// Stored stats overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsDoc {
    pub games_played: u32,
    pub best_score: u32,
    pub best_tile: u32,
    pub streak: u32,
    pub max_streak: u32,
}

impl From<&StatsTracker> for StatsDoc {
    fn from(stats: &StatsTracker) -> Self {
        Self {
            games_played: stats.games_played,
            best_score: stats.best_score,
            best_tile: stats.best_tile,
            streak: stats.streak,
            max_streak: stats.max_streak,
        }
    }
}

impl From<StatsDoc> for StatsTracker {
    fn from(doc: StatsDoc) -> Self {
        StatsTracker {
            games_played: doc.games_played,
            best_score: doc.best_score,
            best_tile: doc.best_tile,
            streak: doc.streak,
            max_streak: doc.max_streak.max(doc.streak),
        }
    }
}

/// Saved-session envelope: `{variant, snapshot, stats}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedSessionDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub snapshot: serde_json::Value,
    pub stats: StatsDoc,
}
