// Planner-owned static tables, per spec.md §6 and Design Note §9 ("Global
// tables"): process-wide, read-only configuration loaded once at startup
// and passed by reference, never mutated.

use crate::action::Action;
use crate::ids::{FlagName, RoomId};
use std::collections::{HashMap, HashSet};

/// Rooms gated by a prerequisite flag, the dark-room set, and the static
/// teleport table. Built once by the top-level `Session` and shared by
/// reference with the Graph Builder, Route Optimizer and Reactive Planner.
#[derive(Clone, Debug, Default)]
pub struct StaticTables {
    pub flag_requirements: HashMap<RoomId, Option<FlagName>>,
    /// Rooms requiring light, per spec.md §4.2's dark-room policy. Authored
    /// data, never derived from any other room property (spec.md §9(c)).
    pub dark_rooms: HashSet<RoomId>,
    /// Teleport edges, e.g. `pray @ south_temple -> forest_1`.
    pub teleport_edges: HashMap<(RoomId, RoomId), Action>,
}

impl StaticTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requires_light(&self, room: RoomId) -> bool {
        self.dark_rooms.contains(&room)
    }

    pub fn flag_requirement(&self, room: RoomId) -> Option<FlagName> {
        self.flag_requirements.get(&room).copied().flatten()
    }

    pub fn teleport_action(&self, from: RoomId, to: RoomId) -> Option<&Action> {
        self.teleport_edges.get(&(from, to))
    }

    /// Every teleport target reachable from `room` in one teleport hop.
    pub fn teleports_from(&self, room: RoomId) -> impl Iterator<Item = (RoomId, &Action)> {
        self.teleport_edges.iter().filter_map(move |((from, to), action)| {
            if *from == room {
                Some((*to, action))
            } else {
                None
            }
        })
    }
}
