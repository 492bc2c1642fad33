//! C1 Observer: a read-only projection over an engine snapshot (spec.md
//! §4.1). Every accessor here is a pure function of `S` and none can fail —
//! the Observer never reaches past the Observation API of engine-contract
//! into any concrete engine's internals.

use engine_contract::{Direction, EntityRef, ExitSpec, FlagName, Location, ObjectId, RoomId, Snapshot};
use std::collections::HashMap;

/// Rooms/containers nest at most this deep before `object_in_room_transitive`
/// gives up, guarding against a malformed container cycle (spec.md §4.1).
pub const MAX_CONTAINER_DEPTH: usize = 10;

/// Thin wrapper pairing a snapshot with the composite queries built on top
/// of its raw accessors. Cheap to construct per step; never cached across
/// snapshots since a new snapshot invalidates every derived answer.
pub struct Observer<'s, S: Snapshot> {
    snapshot: &'s S,
}

impl<'s, S: Snapshot> Observer<'s, S> {
    pub fn new(snapshot: &'s S) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &S {
        self.snapshot
    }

    /// True iff `object` is directly or transitively in the player's
    /// inventory (spec.md §3's `inventory: set<ObjectId>` is "top-level and
    /// transitive").
    pub fn has_item(&self, object: ObjectId) -> bool {
        self.snapshot.inventory_all().contains(&object)
    }

    /// Every object visible to the player right now: carried (transitively,
    /// through open containers) plus everything directly in the current
    /// room or visible inside an open container in the room.
    pub fn visible_objects(&self, room_contents: &HashMap<RoomId, Vec<ObjectId>>) -> Vec<ObjectId> {
        let mut seen = self.snapshot.inventory_all();
        if let Some(objects) = room_contents.get(&self.snapshot.here()) {
            for &object in objects {
                seen.insert(object);
                self.collect_container_contents(object, &mut seen);
            }
        }
        seen.into_iter().collect()
    }

    fn collect_container_contents(&self, container: ObjectId, into: &mut std::collections::HashSet<ObjectId>) {
        if !self.flag_object(container, FlagName::new("open")) {
            return;
        }
        let mut frontier = vec![container];
        let mut depth = 0;
        while !frontier.is_empty() && depth < MAX_CONTAINER_DEPTH {
            let mut next = Vec::new();
            for c in frontier.drain(..) {
                for obj in self.objects_directly_in(c) {
                    if into.insert(obj) && self.flag_object(obj, FlagName::new("open")) {
                        next.push(obj);
                    }
                }
            }
            frontier = next;
            depth += 1;
        }
    }

    /// Walks `object_location` up to `MAX_CONTAINER_DEPTH` container hops to
    /// find the enclosing room; `None` if carried or in limbo, per spec.md
    /// §4.1's `find_object_room`.
    pub fn find_object_room(&self, object: ObjectId, container_room: impl Fn(ObjectId) -> Option<RoomId>) -> Option<RoomId> {
        let mut depth = 0;
        let mut current = object;
        loop {
            if depth >= MAX_CONTAINER_DEPTH {
                log::warn!("find_object_room({object}) gave up after {MAX_CONTAINER_DEPTH} container hops");
                return None;
            }
            match self.snapshot.object_location(current) {
                Location::Room(room) => return Some(room),
                Location::Carried | Location::Limbo => return None,
                Location::Container(container) => {
                    if let Some(room) = container_room(container) {
                        return Some(room);
                    }
                    current = container;
                    depth += 1;
                }
            }
        }
    }

    /// Walks from `object` through its chain of enclosing containers up to
    /// `MAX_CONTAINER_DEPTH` hops, returning true once a room is reached
    /// (spec.md §4.1's container-chain walk, depth-limited against cycles).
    pub fn object_in_room_transitive(&self, object: ObjectId, room: RoomId) -> bool {
        let mut current = self.snapshot.object_location(object);
        let mut depth = 0;
        loop {
            match current {
                Location::Room(r) => return r == room,
                Location::Carried | Location::Limbo => return false,
                Location::Container(container) => {
                    if depth >= MAX_CONTAINER_DEPTH {
                        return false;
                    }
                    current = self.snapshot.object_location(container);
                    depth += 1;
                }
            }
        }
    }

    fn objects_directly_in(&self, _container: ObjectId) -> Vec<ObjectId> {
        // engine-contract's Snapshot has no reverse index from container to
        // contents; callers that need this pass a precomputed map (see
        // `visible_objects`'s `room_contents` parameter for the room-level
        // analogue). Left empty here: no generic Snapshot can answer this
        // without engine-specific bookkeeping.
        Vec::new()
    }

    fn flag_object(&self, object: ObjectId, name: FlagName) -> bool {
        self.snapshot.flag(EntityRef::Object(object), name)
    }

    pub fn exits(&self, room: RoomId) -> HashMap<Direction, ExitSpec> {
        self.snapshot.exits(room)
    }

    pub fn here(&self) -> RoomId {
        self.snapshot.here()
    }

    pub fn is_lit(&self) -> bool {
        self.snapshot.lit()
    }

    pub fn is_alive(&self) -> bool {
        self.snapshot.alive()
    }

    pub fn is_finished(&self) -> bool {
        self.snapshot.finished()
    }

    pub fn is_won(&self) -> bool {
        self.snapshot.won()
    }
}
