// Planner-owned game-specific configuration (spec.md §6): which rooms exist,
// where treasures/enemies/containers live, and the one light source and
// victory room the high-level goals (`LanternOn`, `Win`, `ItemDeposited`)
// are defined in terms of. Authored once at startup, passed by reference.

use engine_contract::{FlagName, ObjectId, RoomId};
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Every room the navigation graph should consider a node (`Snapshot`
    /// has no "list every room" accessor of its own).
    pub rooms: Vec<RoomId>,
    /// Every flag name that can gate a `Conditional`/`Door`/room-gated exit,
    /// used to build the "current" flag budget from whichever of them are
    /// actually set in the snapshot right now (spec.md §4.2).
    pub known_flags: Vec<FlagName>,
    pub victory_room: RoomId,
    pub deposit_room: RoomId,
    pub deposit_container: ObjectId,
    pub light_source: ObjectId,
    /// Treasures in the order `AllTreasuresDeposited` should pursue them.
    pub treasures: Vec<ObjectId>,
    pub enemy_rooms: HashMap<ObjectId, RoomId>,
    pub enemy_weapons: HashMap<ObjectId, ObjectId>,
    /// The cyclops (or any enemy) that must be addressed by `Say("ulysses")`
    /// instead of combat, per spec.md §4.6.
    pub cyclops: Option<ObjectId>,
    pub max_turns: u32,
}

impl PlannerConfig {
    pub fn enemy_room(&self, enemy: ObjectId) -> Option<RoomId> {
        self.enemy_rooms.get(&enemy).copied()
    }

    pub fn enemy_weapon(&self, enemy: ObjectId) -> Option<ObjectId> {
        self.enemy_weapons.get(&enemy).copied()
    }

    pub fn is_cyclops(&self, enemy: ObjectId) -> bool {
        self.cyclops == Some(enemy)
    }
}
