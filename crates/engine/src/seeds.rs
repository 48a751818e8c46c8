//! Seed sources: shared links, daily challenges and fresh random labels.

use chrono::{Local, NaiveDate};
use rand::Rng;
use tile_merge_core::Seed;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a generated random label
pub const RANDOM_LABEL_LEN: usize = 8;

/// `daily-YYYY-MM-DD`
pub fn daily_label(date: NaiveDate) -> String {
    format!("daily-{}", date.format("%Y-%m-%d"))
}

/// Seed of the daily challenge for `date`
pub fn daily(date: NaiveDate) -> Seed {
    Seed::Text(daily_label(date))
}

/// Seed of today's daily challenge (local time)
pub fn today() -> Seed {
    daily(Local::now().date_naive())
}

/// Fresh 8-character base-36 label
pub fn random() -> Seed {
    let mut rng = rand::thread_rng();
    let label: String = (0..RANDOM_LABEL_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    Seed::Text(label)
}

/// Seed from an optional external string; blank or missing means random.
///
/// External strings are labels even when numeric, as in the browser clients.
pub fn resolve(external: Option<&str>) -> Seed {
    match external.map(str::trim) {
        Some(s) if !s.is_empty() => Seed::from(s),
        _ => random(),
    }
}
