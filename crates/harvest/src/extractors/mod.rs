// ABOUTME: Extraction strategies turning fetched HTML into records.
// ABOUTME: Includes basic (selector rules / default groups) and table modes.

//! Content extraction module.
//!
//! Submodules:
//! - `basic`: title plus named content groups from selector rules or defaults.
//! - `tables`: header/data rows from table elements.
//! - `select`: selector compilation and text helpers shared by both modes.

pub mod basic;
pub mod select;
pub mod tables;

pub use basic::extract_basic;
pub use tables::{extract_tables, DEFAULT_TABLE_SELECTOR};

/// ISO-8601 local timestamp with microseconds, taken at extraction time.
pub fn capture_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
