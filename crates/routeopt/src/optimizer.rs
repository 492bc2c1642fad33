// C5 Route Optimizer (spec.md §4.5): distances -> reachable filter -> TSP ->
// prep insertion -> schedule construction, run once offline. The Reactive
// Planner consumes the resulting `Schedule` one entry at a time.

use crate::error::RouteError;
use crate::schedule::{Schedule, ScheduleEntry};
use crate::tsp::{nearest_neighbor, two_opt};
use engine_contract::{FlagName, ObjectId, RoomId, Snapshot, StaticTables};
use navgraph::{build_graph, floyd_warshall_ordered, DistanceMatrix, FlagBudget};
use prepcatalog::{PrepCatalog, PrepId, PrepKind};
use std::collections::{HashMap, HashSet};

const CARRYING_CAPACITY: usize = 7;

pub struct RouteOptimizer<'a> {
    pub tables: &'a StaticTables,
    pub catalog: &'a PrepCatalog,
    pub treasure_rooms: &'a HashMap<ObjectId, RoomId>,
}

impl<'a> RouteOptimizer<'a> {
    /// Step 1: build the permissive (all-known-flags) graph and cache its
    /// Floyd-Warshall distance matrix.
    pub fn distances(&self, snapshot: &impl Snapshot, rooms: Vec<RoomId>, all_known_flags: HashSet<FlagName>) -> DistanceMatrix {
        log::debug!("building permissive distance matrix over {} rooms", rooms.len());
        let budget = FlagBudget::all_known(all_known_flags);
        let mut sorted_rooms = rooms.clone();
        sorted_rooms.sort_by_key(|r| r.as_str());
        let graph = build_graph(snapshot, rooms, self.tables, &budget);
        floyd_warshall_ordered(&graph, sorted_rooms)
    }

    /// Builds the full offline schedule: steps 2-5 of spec.md §4.5.
    pub fn build_schedule(
        &self,
        matrix: &DistanceMatrix,
        start: RoomId,
        treasures: &[ObjectId],
    ) -> Result<Schedule, RouteError> {
        // Step 2: reachable filter.
        let (reachable, unreachable): (Vec<ObjectId>, Vec<ObjectId>) = treasures
            .iter()
            .copied()
            .partition(|t| self.treasure_rooms.get(t).and_then(|r| matrix.distance(start, *r)).is_some());
        if !unreachable.is_empty() {
            log::warn!("{} treasure(s) unreachable from {start}, appending without ordering", unreachable.len());
        }

        // Step 3: TSP over reachable treasure rooms.
        let stops: Vec<RoomId> = reachable.iter().map(|t| self.treasure_rooms[t]).collect();
        let distance = |a: RoomId, b: RoomId| matrix.distance(a, b);
        let nn_route = nearest_neighbor(start, &stops, &distance);
        let optimized_rooms = two_opt(start, &nn_route, &distance);

        // Map optimized room order back to treasure ids (first unused
        // treasure whose room matches, preserving stability for same-room
        // treasures).
        let mut by_room: HashMap<RoomId, Vec<ObjectId>> = HashMap::new();
        for &t in &reachable {
            by_room.entry(self.treasure_rooms[&t]).or_default().push(t);
        }
        let mut visit_order: Vec<ObjectId> = Vec::new();
        for room in &optimized_rooms {
            if let Some(bucket) = by_room.get_mut(room) {
                if let Some(t) = bucket.pop() {
                    visit_order.push(t);
                }
            }
        }

        // Step 4: prep insertion, minimizing d(prev, prep_loc) + d(prep_loc,
        // next) - d(prev, next) for each required prep.
        let required_preps = self.catalog.preps_for_treasures(visit_order.iter().copied())?;
        let mut stops_with_kind: Vec<Stop> = visit_order.iter().map(|&t| Stop::Treasure(t)).collect();
        for prep_id in &required_preps {
            let prep = self.catalog.get(prep_id).expect("catalog returned its own id");
            let Some(&loc) = prep.locations.first() else { continue };
            // Preps sharing a location with a treasure stop are merged onto
            // that stop instead of inserted separately.
            if let Some(pos) = stops_with_kind.iter().position(|s| self.stop_room(s) == Some(loc) && matches!(s, Stop::Treasure(_))) {
                if let Stop::Treasure(t) = stops_with_kind[pos] {
                    stops_with_kind[pos] = Stop::Merged(prep_id.clone(), t);
                    continue;
                }
            }
            let best_index = self.best_insertion_index(&stops_with_kind, start, loc, matrix);
            stops_with_kind.insert(best_index, Stop::Prep(prep_id.clone()));
        }

        // Step 5: schedule construction.
        let mut schedule = Schedule::default();
        let mut carried = 0usize;
        let mut current_room = start;

        for stop in &stops_with_kind {
            if let Some(room) = self.stop_room(stop) {
                if room != current_room {
                    schedule.push(ScheduleEntry::Move { to: room });
                    current_room = room;
                }
            }
            match stop {
                Stop::Prep(id) => {
                    schedule.push(ScheduleEntry::Prep { id: id.clone() });
                    self.emit_atomic_or_parallel(&mut schedule, id, &visit_order, matrix, current_room);
                }
                Stop::Treasure(t) => {
                    schedule.push(ScheduleEntry::Collect { treasure: *t });
                    carried += 1;
                    if carried >= CARRYING_CAPACITY {
                        schedule.push(ScheduleEntry::Move { to: start });
                        schedule.push(ScheduleEntry::DepositAll);
                        current_room = start;
                        carried = 0;
                    }
                }
                Stop::Merged(id, t) => {
                    schedule.push(ScheduleEntry::Prep { id: id.clone() });
                    schedule.push(ScheduleEntry::Collect { treasure: *t });
                    carried += 1;
                    if carried >= CARRYING_CAPACITY {
                        schedule.push(ScheduleEntry::Move { to: start });
                        schedule.push(ScheduleEntry::DepositAll);
                        current_room = start;
                        carried = 0;
                    }
                }
            }
        }
        if carried > 0 {
            if current_room != start {
                schedule.push(ScheduleEntry::Move { to: start });
            }
            schedule.push(ScheduleEntry::DepositAll);
        }

        // Unreachable treasures are retained (for the planner to refuse or
        // attempt later) but never placed in the TSP tour; they're appended
        // as trailing Collect entries with no ordering guarantee, per
        // spec.md §4.5/§8's boundary property.
        for t in unreachable {
            schedule.push(ScheduleEntry::Collect { treasure: t });
        }

        log::info!("built schedule: {} entries for {} treasures from {start}", schedule.entries.len(), treasures.len());
        Ok(schedule)
    }

    fn stop_room(&self, stop: &Stop) -> Option<RoomId> {
        match stop {
            Stop::Treasure(t) | Stop::Merged(_, t) => self.treasure_rooms.get(t).copied(),
            Stop::Prep(id) => self.catalog.get(id).and_then(|p| p.locations.first().copied()),
        }
    }

    fn best_insertion_index(&self, stops: &[Stop], start: RoomId, prep_loc: RoomId, matrix: &DistanceMatrix) -> usize {
        let rooms: Vec<RoomId> = std::iter::once(start).chain(stops.iter().filter_map(|s| self.stop_room(s))).collect();
        let mut best_index = stops.len();
        let mut best_cost = u32::MAX;
        for i in 0..rooms.len() {
            let prev = rooms[i];
            let next = rooms.get(i + 1).copied().unwrap_or(prev);
            let d_prev_next = matrix.distance(prev, next).unwrap_or(0);
            let d_prev_prep = matrix.distance(prev, prep_loc).unwrap_or(u32::MAX / 2);
            let d_prep_next = matrix.distance(prep_loc, next).unwrap_or(u32::MAX / 2);
            let cost = (d_prev_prep + d_prep_next).saturating_sub(d_prev_next);
            if cost < best_cost {
                best_cost = cost;
                best_index = i;
            }
        }
        best_index.min(stops.len())
    }

    /// For a `Timed`/`Atomic` prep with a delayed flag, emits either an
    /// `AtomicSequence` (contiguous, interruption forbidden) or a
    /// `ParallelWork` entry listing treasures reachable and returnable
    /// within the delay window, per spec.md §4.5.
    fn emit_atomic_or_parallel(
        &self,
        schedule: &mut Schedule,
        id: &PrepId,
        visit_order: &[ObjectId],
        matrix: &DistanceMatrix,
        prep_room: RoomId,
    ) {
        let Some(prep) = self.catalog.get(id) else { return };
        match &prep.kind {
            PrepKind::Atomic { steps, window } => {
                schedule.push(ScheduleEntry::AtomicSequence {
                    id: id.clone(),
                    name: prep.description.clone(),
                    location: prep_room,
                    steps: steps.clone(),
                    window: *window,
                });
            }
            PrepKind::Timed => {
                let Some((flag, turns)) = prep.effect.delayed else { return };
                let mut during_treasures = Vec::new();
                let mut budget_used = 0u32;
                for &t in visit_order {
                    let Some(room) = self.treasure_rooms.get(&t).copied() else { continue };
                    let round_trip = matrix
                        .distance(prep_room, room)
                        .zip(matrix.distance(room, prep_room))
                        .map(|(a, b)| a + b)
                        .unwrap_or(u32::MAX);
                    if budget_used + round_trip <= turns {
                        budget_used += round_trip;
                        during_treasures.push(t);
                    }
                }
                if !during_treasures.is_empty() {
                    schedule.push(ScheduleEntry::ParallelWork { during: (flag, turns), treasures: during_treasures });
                }
            }
            PrepKind::Immediate | PrepKind::Combat { .. } => {}
        }
    }
}

#[derive(Clone, Debug)]
enum Stop {
    Treasure(ObjectId),
    Prep(PrepId),
    Merged(PrepId, ObjectId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::WorldBuilder;
    use engine_contract::{Direction, ExitSpec};
    use prepcatalog::{Effect, PrepAction, PrepCatalog, PrepKind, Requirement};
    use std::collections::HashMap as StdHashMap;

    fn three_room_world() -> (engine_contract::testkit::InMemorySnapshot, StaticTables, Vec<RoomId>) {
        let start = RoomId::new("start");
        let a = RoomId::new("room_a");
        let b = RoomId::new("room_b");
        let mut start_exits = StdHashMap::new();
        start_exits.insert(Direction::new("n"), ExitSpec::Direct { to: a });
        start_exits.insert(Direction::new("e"), ExitSpec::Direct { to: b });
        let (layout, state) =
            WorldBuilder::new().room(start, start_exits).room(a, StdHashMap::new()).room(b, StdHashMap::new()).start_at(start).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        (snap, StaticTables::new(), vec![start, a, b])
    }

    #[test]
    fn schedule_collects_every_reachable_treasure_and_deposits() {
        let (snap, tables, rooms) = three_room_world();
        let egg = ObjectId::new("egg");
        let coin = ObjectId::new("coin");
        let mut treasure_rooms = StdHashMap::new();
        treasure_rooms.insert(egg, RoomId::new("room_a"));
        treasure_rooms.insert(coin, RoomId::new("room_b"));

        let catalog = PrepCatalog::builder().build().unwrap();
        let optimizer = RouteOptimizer { tables: &tables, catalog: &catalog, treasure_rooms: &treasure_rooms };
        let matrix = optimizer.distances(&snap, rooms, HashSet::new());
        let schedule = optimizer.build_schedule(&matrix, RoomId::new("start"), &[egg, coin]).unwrap();

        let collects: Vec<_> = schedule
            .iter()
            .filter_map(|e| if let ScheduleEntry::Collect { treasure } = e { Some(*treasure) } else { None })
            .collect();
        assert_eq!(collects.len(), 2);
        assert!(schedule.iter().any(|e| matches!(e, ScheduleEntry::DepositAll)));
        assert!(schedule.deposit_all_preceded_by_collect());
    }

    #[test]
    fn unreachable_treasure_is_retained_but_appended_last() {
        let (snap, tables, rooms) = three_room_world();
        let egg = ObjectId::new("egg");
        let ghost = ObjectId::new("ghost_treasure");
        let mut treasure_rooms = StdHashMap::new();
        treasure_rooms.insert(egg, RoomId::new("room_a"));
        treasure_rooms.insert(ghost, RoomId::new("nowhere"));

        let catalog = PrepCatalog::builder().build().unwrap();
        let optimizer = RouteOptimizer { tables: &tables, catalog: &catalog, treasure_rooms: &treasure_rooms };
        let matrix = optimizer.distances(&snap, rooms, HashSet::new());
        let schedule = optimizer.build_schedule(&matrix, RoomId::new("start"), &[ghost, egg]).unwrap();

        let collects: Vec<_> = schedule
            .iter()
            .filter_map(|e| if let ScheduleEntry::Collect { treasure } = e { Some(*treasure) } else { None })
            .collect();
        assert_eq!(*collects.last().unwrap(), ghost);
    }

    #[test]
    fn required_prep_precedes_its_treasure_collect() {
        let (snap, tables, rooms) = three_room_world();
        let egg = ObjectId::new("egg");
        let mut treasure_rooms = StdHashMap::new();
        treasure_rooms.insert(egg, RoomId::new("room_a"));

        let unlock = PrepAction {
            id: PrepId::new("unlock_case_a"),
            description: "unlock the case".into(),
            locations: vec![RoomId::new("room_a")],
            requires: vec![Requirement::Flag(FlagName::new("have_key"))],
            effect: Effect { immediate_flags: [FlagName::new("case_a_unlocked")].into_iter().collect(), delayed: None },
            kind: PrepKind::Immediate,
            action: Some(engine_contract::Action::Unlock { object: ObjectId::new("case_a"), key: ObjectId::new("key") }),
        };
        let catalog = PrepCatalog::builder()
            .prep(unlock)
            .treasure_requires(egg, [FlagName::new("case_a_unlocked")])
            .build()
            .unwrap();
        let optimizer = RouteOptimizer { tables: &tables, catalog: &catalog, treasure_rooms: &treasure_rooms };
        let matrix = optimizer.distances(&snap, rooms, HashSet::new());
        let schedule = optimizer.build_schedule(&matrix, RoomId::new("start"), &[egg]).unwrap();
        assert!(schedule.first_missing_prep_violation(&catalog).is_none());
    }
}
