// C2 Graph Builder (spec.md §4.2): derives a `NavigationGraph` from a
// snapshot and a flag budget. Rules are applied per directed exit exactly
// in the order spec.md enumerates them.

use engine_contract::{Action, Direction, EntityRef, ExitSpec, FlagName, PreAction, RoomId, Snapshot, StaticTables};
use std::collections::{HashMap, HashSet};

/// Which flags a graph is allowed to treat as "passable" when deciding
/// whether a flag-gated edge exists. `Current` mirrors what's actually true
/// in the snapshot right now (used by the Reactive Planner to move *now*);
/// `AllKnown` includes every flag the prep catalog may eventually produce
/// (used by the Route Optimizer to plan through future state), per
/// spec.md §4.2.
#[derive(Clone, Debug)]
pub enum FlagBudget {
    Current(HashSet<FlagName>),
    AllKnown(HashSet<FlagName>),
}

impl FlagBudget {
    pub fn from_snapshot(snapshot: &impl Snapshot, known_flags: impl IntoIterator<Item = FlagName>) -> Self {
        let set = known_flags
            .into_iter()
            .filter(|f| snapshot.flag(EntityRef::Global, *f))
            .collect();
        FlagBudget::Current(set)
    }

    pub fn all_known(flags: impl IntoIterator<Item = FlagName>) -> Self {
        FlagBudget::AllKnown(flags.into_iter().collect())
    }

    pub fn contains(&self, flag: FlagName) -> bool {
        match self {
            FlagBudget::Current(s) | FlagBudget::AllKnown(s) => s.contains(&flag),
        }
    }
}

/// How an edge is traversed: a compass/verb direction taken from the room's
/// exit table, or an explicit teleport action (spec.md §3's
/// `via: Direction | Teleport{action}`).
#[derive(Clone, Debug)]
pub enum Via {
    Direction(Direction),
    Teleport(Action),
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub to: RoomId,
    pub via: Via,
    pub guards: HashSet<FlagName>,
    pub pre_action: Option<PreAction>,
}

/// Nodes are every known room; edges are annotated per spec.md §3. Also
/// serves as the "`DirectedGraph`" variant of spec.md §4.2 since every edge
/// already records the direction that produced it.
#[derive(Clone, Debug, Default)]
pub struct NavigationGraph {
    rooms: HashSet<RoomId>,
    edges: HashMap<RoomId, Vec<Edge>>,
}

impl NavigationGraph {
    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.rooms.iter()
    }

    pub fn edges_from(&self, room: RoomId) -> &[Edge] {
        self.edges.get(&room).map(Vec::as_slice).unwrap_or(&[])
    }

    fn add_room(&mut self, room: RoomId) {
        self.rooms.insert(room);
    }

    fn add_edge(&mut self, from: RoomId, edge: Edge) {
        self.add_room(from);
        self.add_room(edge.to);
        self.edges.entry(from).or_default().push(edge);
    }
}

/// Builds a `NavigationGraph` from `(snapshot, flag_budget)` over the given
/// room set, per spec.md §4.2's numbered rules. `rooms` must enumerate
/// every room the builder should consider a node, since `Snapshot` itself
/// has no "list every room" accessor (only `exits(room)` for a room already
/// known).
pub fn build_graph(
    snapshot: &impl Snapshot,
    rooms: impl IntoIterator<Item = RoomId>,
    tables: &StaticTables,
    budget: &FlagBudget,
) -> NavigationGraph {
    let mut graph = NavigationGraph::default();

    for room in rooms {
        graph.add_room(room);
        for (direction, exit) in snapshot.exits(room) {
            match exit {
                // Rule 1: one-way blocked exits are excluded unconditionally.
                ExitSpec::Blocked { .. } => {
                    log::debug!("{room} --{direction}--> blocked, excluded");
                }
                ExitSpec::Direct { to } => {
                    if !passes_room_gate(to, tables, budget) {
                        log::debug!("{room} --{direction}--> {to} excluded, room gate not satisfied");
                        continue;
                    }
                    graph.add_edge(
                        room,
                        Edge { to, via: Via::Direction(direction), guards: HashSet::new(), pre_action: None },
                    );
                }
                ExitSpec::Conditional { to, requires_flag } => {
                    if !budget.contains(requires_flag) {
                        log::debug!("{room} --{direction}--> {to} excluded, flag {requires_flag} not in budget");
                        continue;
                    }
                    if !passes_room_gate(to, tables, budget) {
                        log::debug!("{room} --{direction}--> {to} excluded, room gate not satisfied");
                        continue;
                    }
                    let mut guards = HashSet::new();
                    guards.insert(requires_flag);
                    graph.add_edge(room, Edge { to, via: Via::Direction(direction), guards, pre_action: None });
                }
                ExitSpec::Door { to, pre, .. } => {
                    // Rule 4: doors are always included (they're openable);
                    // the pre-action (unlock/open) travels with the edge.
                    if !passes_room_gate(to, tables, budget) {
                        log::debug!("{room} --{direction}--> {to} (door) excluded, room gate not satisfied");
                        continue;
                    }
                    graph.add_edge(
                        room,
                        Edge { to, via: Via::Direction(direction), guards: HashSet::new(), pre_action: pre },
                    );
                }
            }
        }
        // Rule 6: static teleport edges out of this room.
        for (to, action) in tables.teleports_from(room) {
            log::debug!("{room} --teleport--> {to}");
            graph.add_edge(room, Edge { to, via: Via::Teleport(action.clone()), guards: HashSet::new(), pre_action: None });
        }
    }

    log::debug!("built navigation graph: {} rooms", graph.rooms.len());
    graph
}

fn passes_room_gate(to: RoomId, tables: &StaticTables, budget: &FlagBudget) -> bool {
    match tables.flag_requirement(to) {
        Some(flag) => budget.contains(flag),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::WorldBuilder;

    #[test]
    fn conditional_edge_excluded_outside_budget() {
        let west = RoomId::new("west_of_house");
        let forest = RoomId::new("forest");
        let mut exits = HashMap::new();
        exits.insert(Direction::new("north"), ExitSpec::Conditional { to: forest, requires_flag: FlagName::new("door_open") });
        let (layout, state) = WorldBuilder::new().room(west, exits).room(forest, HashMap::new()).start_at(west).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);

        let tables = StaticTables::new();
        let empty_budget = FlagBudget::Current(HashSet::new());
        let graph = build_graph(&snap, [west, forest], &tables, &empty_budget);
        assert!(graph.edges_from(west).is_empty());

        let mut full = HashSet::new();
        full.insert(FlagName::new("door_open"));
        let full_budget = FlagBudget::Current(full);
        let graph = build_graph(&snap, [west, forest], &tables, &full_budget);
        assert_eq!(graph.edges_from(west).len(), 1);
    }

    #[test]
    fn blocked_exit_never_included() {
        let a = RoomId::new("a");
        let b = RoomId::new("b");
        let mut exits = HashMap::new();
        exits.insert(Direction::new("down"), ExitSpec::Blocked { message: "Too steep.".into() });
        let (layout, state) = WorldBuilder::new().room(a, exits).room(b, HashMap::new()).start_at(a).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let tables = StaticTables::new();
        let budget = FlagBudget::Current(HashSet::new());
        let graph = build_graph(&snap, [a, b], &tables, &budget);
        assert!(graph.edges_from(a).is_empty());
    }

    #[test]
    fn flag_gated_room_excludes_edge_until_budget_grants_it() {
        let cellar_entrance = RoomId::new("living_room");
        let cellar = RoomId::new("cellar");
        let mut exits = HashMap::new();
        exits.insert(Direction::new("down"), ExitSpec::Direct { to: cellar });
        let (layout, state) = WorldBuilder::new()
            .room(cellar_entrance, exits)
            .room(cellar, HashMap::new())
            .start_at(cellar_entrance)
            .build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);

        let mut tables = StaticTables::new();
        tables.flag_requirements.insert(cellar, Some(FlagName::new("rug_moved")));

        let budget = FlagBudget::Current(HashSet::new());
        let graph = build_graph(&snap, [cellar_entrance, cellar], &tables, &budget);
        assert!(graph.edges_from(cellar_entrance).is_empty());

        let mut granted = HashSet::new();
        granted.insert(FlagName::new("rug_moved"));
        let budget = FlagBudget::Current(granted);
        let graph = build_graph(&snap, [cellar_entrance, cellar], &tables, &budget);
        assert_eq!(graph.edges_from(cellar_entrance).len(), 1);
    }
}
