// The Engine trait is the planner's only way to touch the outside world: one
// method to read the current snapshot, one to execute an action and observe
// the result, and four to manage the shared PRNG (spec.md §6's PRNG API).
//
// No concrete game engine is implemented in this workspace — spec.md §1
// scopes the Game Engine out as an external collaborator. `testkit` below
// provides just enough of an in-memory stand-in to exercise and test the
// planner end to end.

use crate::action::Action;
use crate::snapshot::Snapshot;

/// An opaque, cheaply-cloneable capture of the engine's PRNG state
/// (including its call counter), per spec.md §3's `PRNGCheckpoint`.
pub trait Checkpoint: Clone + PartialEq + std::fmt::Debug {}
impl<T: Clone + PartialEq + std::fmt::Debug> Checkpoint for T {}

/// The full Engine Contract: Observation API (via `Self::Snapshot`), Action
/// API, and PRNG API, per spec.md §6.
pub trait Engine {
    type Snapshot: Snapshot;
    type Checkpoint: Checkpoint;

    /// The current world snapshot. Pure; safe to call as often as needed.
    fn snapshot(&self) -> Self::Snapshot;

    /// Executes one action, returning the resulting snapshot and a
    /// human-readable message. Deterministic given `(S, PRNG)`; never
    /// throws — structural failures surface as `Status::Error` one layer up
    /// if an implementation panics, per spec.md §7.
    fn execute(&mut self, action: &Action) -> (Self::Snapshot, String);

    fn rng_save(&self) -> Self::Checkpoint;
    fn rng_restore(&mut self, checkpoint: Self::Checkpoint);
    fn rng_advance(&mut self, n: u64);
    fn rng_call_count(&self) -> u64;
}
