// The Observation API of spec.md §6: a read-only projection over an
// immutable engine snapshot. Every accessor here is a pure function of `S`
// — no accessor here may fail, matching spec.md §4.1 ("No errors; all
// queries total").

use crate::ids::{Direction, EntityRef, FlagName, ObjectId, RoomId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Where an object currently is, per spec.md §3.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Location {
    Room(RoomId),
    Container(ObjectId),
    Carried,
    Limbo,
}

/// One action to perform before a door/rug/etc-gated traversal can proceed,
/// e.g. `Open(door)` or `Move(rug)`. Attached to `ExitSpec::Door` edges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreAction {
    pub description: String,
    pub action: crate::action::Action,
    /// The flag that, once set, means this pre-action no longer needs to
    /// run (e.g. `door_open`). `None` means always re-check via the engine.
    pub satisfied_when: Option<FlagName>,
}

/// A single exit out of a room, tagged per spec.md §3.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ExitSpec {
    Direct { to: RoomId },
    Conditional { to: RoomId, requires_flag: FlagName },
    Door {
        to: RoomId,
        door: ObjectId,
        one_way: bool,
        needs_unlock: bool,
        key: Option<ObjectId>,
        pre: Option<PreAction>,
    },
    Blocked { message: String },
}

/// Read-only projection over the engine's world-snapshot. Implementations
/// are expected to be cheap to clone (an `Rc`/`Arc`-backed value type, or a
/// plain struct of small fields) since the planner discards and rebuilds
/// its view of `S` after every action.
pub trait Snapshot: Clone {
    fn here(&self) -> RoomId;
    fn inventory(&self) -> HashSet<ObjectId>;
    /// Inventory including items nested in carried open containers.
    fn inventory_all(&self) -> HashSet<ObjectId>;
    fn object_location(&self, object: ObjectId) -> Location;
    fn flag(&self, entity: EntityRef, name: FlagName) -> bool;
    fn exits(&self, room: RoomId) -> HashMap<Direction, ExitSpec>;

    fn score(&self) -> i64;
    fn moves(&self) -> u32;
    fn deaths(&self) -> u32;
    fn lit(&self) -> bool;
    fn alive(&self) -> bool;
    fn won(&self) -> bool;
    fn finished(&self) -> bool;
}
