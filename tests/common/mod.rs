//! Shared helpers for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Local, TimeZone};
use tempfile::TempDir;

use kellogs_universe::Universe;
use kellogs_universe::config::Config;

/// Opens a universe backed by a SQLite file in a fresh temp dir.
/// Keep the `TempDir` alive for as long as the universe is used.
pub fn open_temp_universe(config: Config) -> (TempDir, Universe) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let universe = reopen(&temp_dir, config);
    (temp_dir, universe)
}

/// Opens the database inside `temp_dir` again
pub fn reopen(temp_dir: &TempDir, config: Config) -> Universe {
    Universe::open_at(config, &temp_dir.path().join("universe.db")).expect("Failed to open universe")
}

/// Local noon on the given day of May 2024
pub fn noon(day: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 5, day, 12, 0, 0)
        .single()
        .expect("Noon is never ambiguous")
}
