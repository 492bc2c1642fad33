//! The Engine Contract: identifier types, the Observation/Action/PRNG APIs,
//! and the planner-owned static tables that every other `zorkplan` crate is
//! built against. No concrete interactive-fiction engine lives here — see
//! spec.md §1 and §6.

pub mod action;
pub mod engine;
pub mod error;
pub mod ids;
pub mod snapshot;
pub mod tables;
#[cfg(feature = "testkit")]
pub mod testkit;

pub use action::Action;
pub use engine::Engine;
pub use error::ConfigError;
pub use ids::{Direction, EntityRef, FlagName, Id, ObjectId, RoomId, Symbol};
pub use snapshot::{ExitSpec, Location, PreAction, Snapshot};
pub use tables::StaticTables;
