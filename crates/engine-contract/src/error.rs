// Config-time errors shared across crates, per spec.md §7's `ConfigError`
// category: fatal at startup, never recoverable by the Reactive Planner.

use crate::ids::RoomId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("prep dependency graph contains a cycle at {0}")]
    CyclicPrepGraph(String),

    #[error("static table references unknown room: {0}")]
    UnknownRoom(RoomId),

    #[error("missing required static table: {0}")]
    MissingTable(String),
}
