//! In-memory reference engine used by every crate's test suite (spec.md §1
//! scopes the real Game Engine out; this is just enough of a stand-in to
//! drive the six end-to-end scenarios of spec.md §8).

pub mod engine;
pub mod world;

pub use engine::{CombatProfile, RngCheckpoint, TestEngine, ThiefProfile};
pub use world::{InMemorySnapshot, WorldBuilder, WorldLayout, WorldState};
