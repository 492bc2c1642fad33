// A minimal in-memory world model satisfying the Observation API (spec.md
// §6). Not a claim about any real interactive-fiction engine's internals —
// spec.md §1 places the actual Game Engine out of scope. This exists solely
// so the planner crates have something concrete to drive in their tests.

use crate::ids::{Direction, EntityRef, FlagName, ObjectId, RoomId};
use crate::snapshot::{ExitSpec, Location, Snapshot};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct RoomDef {
    pub exits: HashMap<Direction, ExitSpec>,
}

#[derive(Clone, Default)]
pub struct WorldLayout {
    pub rooms: HashMap<RoomId, RoomDef>,
}

/// Builds a `WorldLayout` plus the initial dynamic state for a `TestEngine`.
/// Scenario tests construct exactly the rooms/objects/flags they need rather
/// than sharing one monolithic map.
#[derive(Default)]
pub struct WorldBuilder {
    layout: WorldLayout,
    here: Option<RoomId>,
    locations: HashMap<ObjectId, Location>,
    open_containers: HashSet<ObjectId>,
    container_contents: HashMap<ObjectId, HashSet<ObjectId>>,
    flags: HashMap<(EntityRef, FlagName), bool>,
    lit: bool,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self { lit: true, ..Default::default() }
    }

    pub fn room(mut self, id: RoomId, exits: HashMap<Direction, ExitSpec>) -> Self {
        self.layout.rooms.insert(id, RoomDef { exits });
        self
    }

    pub fn start_at(mut self, room: RoomId) -> Self {
        self.here = Some(room);
        self
    }

    pub fn object_in_room(mut self, object: ObjectId, room: RoomId) -> Self {
        self.locations.insert(object, Location::Room(room));
        self
    }

    pub fn object_carried(mut self, object: ObjectId) -> Self {
        self.locations.insert(object, Location::Carried);
        self
    }

    pub fn object_in_container(mut self, object: ObjectId, container: ObjectId) -> Self {
        self.locations.insert(object, Location::Container(container));
        self.container_contents.entry(container).or_default().insert(object);
        self
    }

    pub fn container_open(mut self, container: ObjectId) -> Self {
        self.open_containers.insert(container);
        self
    }

    pub fn flag(mut self, entity: EntityRef, name: FlagName, value: bool) -> Self {
        self.flags.insert((entity, name), value);
        self
    }

    pub fn lit(mut self, lit: bool) -> Self {
        self.lit = lit;
        self
    }

    pub fn build(self) -> (Arc<WorldLayout>, WorldState) {
        let state = WorldState {
            here: self.here.expect("WorldBuilder::start_at must be called"),
            locations: self.locations,
            open_containers: self.open_containers,
            container_contents: self.container_contents,
            flags: self.flags,
            score: 0,
            moves: 0,
            deaths: 0,
            lit: self.lit,
            alive: true,
            won: false,
            finished: false,
        };
        (Arc::new(self.layout), state)
    }
}

/// The dynamic part of a world: everything that changes as actions execute.
/// `TestEngine` owns one of these and mutates it in place; `InMemorySnapshot`
/// holds an immutable clone taken after each action.
#[derive(Clone)]
pub struct WorldState {
    pub here: RoomId,
    pub locations: HashMap<ObjectId, Location>,
    pub open_containers: HashSet<ObjectId>,
    pub container_contents: HashMap<ObjectId, HashSet<ObjectId>>,
    pub flags: HashMap<(EntityRef, FlagName), bool>,
    pub score: i64,
    pub moves: u32,
    pub deaths: u32,
    pub lit: bool,
    pub alive: bool,
    pub won: bool,
    pub finished: bool,
}

#[derive(Clone)]
pub struct InMemorySnapshot {
    pub(crate) layout: Arc<WorldLayout>,
    pub(crate) state: Arc<WorldState>,
}

impl InMemorySnapshot {
    pub fn new(layout: Arc<WorldLayout>, state: WorldState) -> Self {
        Self { layout, state: Arc::new(state) }
    }
}

const MAX_CONTAINER_DEPTH: usize = 10;

impl Snapshot for InMemorySnapshot {
    fn here(&self) -> RoomId {
        self.state.here
    }

    fn inventory(&self) -> HashSet<ObjectId> {
        self.state
            .locations
            .iter()
            .filter_map(|(obj, loc)| matches!(loc, Location::Carried).then_some(*obj))
            .collect()
    }

    fn inventory_all(&self) -> HashSet<ObjectId> {
        let mut result = self.inventory();
        let mut frontier: Vec<ObjectId> = result.iter().copied().collect();
        let mut depth = 0;
        while !frontier.is_empty() && depth < MAX_CONTAINER_DEPTH {
            let mut next = Vec::new();
            for container in &frontier {
                if !self.state.open_containers.contains(container) {
                    continue;
                }
                if let Some(contents) = self.state.container_contents.get(container) {
                    for item in contents {
                        if result.insert(*item) {
                            next.push(*item);
                        }
                    }
                }
            }
            frontier = next;
            depth += 1;
        }
        result
    }

    fn object_location(&self, object: ObjectId) -> Location {
        self.state.locations.get(&object).copied().unwrap_or(Location::Limbo)
    }

    fn flag(&self, entity: EntityRef, name: FlagName) -> bool {
        self.state.flags.get(&(entity, name)).copied().unwrap_or(false)
    }

    fn exits(&self, room: RoomId) -> HashMap<Direction, ExitSpec> {
        self.layout.rooms.get(&room).map(|r| r.exits.clone()).unwrap_or_default()
    }

    fn score(&self) -> i64 {
        self.state.score
    }

    fn moves(&self) -> u32 {
        self.state.moves
    }

    fn deaths(&self) -> u32 {
        self.state.deaths
    }

    fn lit(&self) -> bool {
        self.state.lit
    }

    fn alive(&self) -> bool {
        self.state.alive
    }

    fn won(&self) -> bool {
        self.state.won
    }

    fn finished(&self) -> bool {
        self.state.finished
    }
}
