use engine_contract::RoomId;
use thiserror::Error;

/// Recoverable per spec.md §7: the Reactive Planner transitions to
/// `Stuck(NoPath)` and C8 attempts a reroute rather than treating this as
/// fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("no path from {from} to {to}")]
    NoPath { from: RoomId, to: RoomId },
}
