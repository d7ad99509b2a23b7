//! Error types for the fallible edges: settings loading and report merging.
//! Planning itself never fails.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::coordinates::Coordinates;
use crate::report::InfoLevel;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse planner settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read planner settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("cannot merge an empty list of report shards")]
    Empty,
    #[error("shard for {found} does not belong to report for {expected}")]
    CoordinatesMismatch {
        expected: Coordinates,
        found: Coordinates,
    },
    #[error("shard info level {next:?} does not increase on {previous:?}")]
    InfoLevelNotIncreasing {
        previous: InfoLevel,
        next: InfoLevel,
    },
    #[error("shard at info level {level:?} is missing its {section} section")]
    MissingSection {
        level: InfoLevel,
        section: &'static str,
    },
}
