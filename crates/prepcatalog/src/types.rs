// The static shape of a prep action (spec.md §3's `PrepAction`): what it
// needs, what it produces, and how it must be executed.

use engine_contract::{Action, FlagName, ObjectId, RoomId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifies a prep action within a `PrepCatalog`. Plain string id (preps
/// are small, authored-by-hand tables; no need for interning here).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct PrepId(pub String);

impl PrepId {
    pub fn new(s: impl Into<String>) -> Self {
        PrepId(s.into())
    }
}

impl std::fmt::Display for PrepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A prep's prerequisite: either a carried/visible item or a flag that must
/// already be set, per spec.md §3's `requires: set<ObjectId ∪ FlagName>`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Requirement {
    Item(ObjectId),
    Flag(FlagName),
}

/// What running a prep changes: flags that become true immediately, and
/// optionally one flag that becomes true only after a delay (spec.md §3).
#[derive(Clone, Debug, Default)]
pub struct Effect {
    pub immediate_flags: HashSet<FlagName>,
    pub delayed: Option<(FlagName, u32)>,
}

impl Effect {
    pub fn produces(&self, flag: FlagName) -> bool {
        self.immediate_flags.contains(&flag) || self.delayed.map(|(f, _)| f) == Some(flag)
    }
}

/// One step of an `Atomic` prep sequence: a concrete action plus the
/// location it must be performed in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtomicStep {
    pub description: String,
    pub action: Action,
    pub location: RoomId,
}

/// How a prep must be executed, per spec.md §3.
#[derive(Clone, Debug)]
pub enum PrepKind {
    Immediate,
    Combat { target: ObjectId },
    Timed,
    /// Must execute without interruption within `window` turns of the first
    /// step (spec.md §4.5's `AtomicSequence` schedule entry, §8 scenario S4).
    Atomic { steps: Vec<AtomicStep>, window: u32 },
}

#[derive(Clone, Debug)]
pub struct PrepAction {
    pub id: PrepId,
    pub description: String,
    pub locations: Vec<RoomId>,
    pub requires: Vec<Requirement>,
    pub effect: Effect,
    pub kind: PrepKind,
    /// The single concrete action that performs this prep, for `Immediate`/
    /// `Timed` kinds (spec.md §4.6's Reactive Planner needs something to
    /// actually submit once a prep's `requires` are met and the player is in
    /// position). `Combat` preps are driven through `KillEnemy` instead, and
    /// `Atomic` preps carry their own per-step actions, so both leave this
    /// `None`.
    pub action: Option<Action>,
}

impl PrepAction {
    pub fn produces(&self, flag: FlagName) -> bool {
        self.effect.produces(flag)
    }
}
