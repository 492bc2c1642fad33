// C6 Reactive Planner action-selection rules (spec.md §4.6): "authoritative
// per goal type." One call inspects exactly one goal against the current
// snapshot and returns exactly one `Decision`.

use crate::config::PlannerConfig;
use crate::goal::Goal;
use engine_contract::{Action, EntityRef, FlagName, Location, ObjectId, RoomId, Snapshot, StaticTables};
use navgraph::{build_graph, path_to_commands, shortest_path, FlagBudget};
use observer::Observer;
use prepcatalog::{PrepCatalog, PrepId, PrepKind, Requirement};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StuckReason {
    NoPath { from: RoomId, to: RoomId },
    NoWinningOffset,
    CycleExhausted,
    Unreachable(String),
}

impl std::fmt::Display for StuckReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StuckReason::NoPath { from, to } => write!(f, "no path from {from} to {to}"),
            StuckReason::NoWinningOffset => write!(f, "no winning combat offset found within budget"),
            StuckReason::CycleExhausted => write!(f, "every candidate sub-goal would cycle"),
            StuckReason::Unreachable(msg) => write!(f, "{msg}"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum Decision {
    Satisfied,
    Decompose(Vec<Goal>),
    Action(Action),
    /// Run the next step of this prep's `PrepKind::Atomic` sequence
    /// (spec.md §3, §4.5's `AtomicSequence`, §8 scenario S4).
    /// `select_action_for` only identifies which atomic prep is ready to
    /// run; `PlannerState` owns the in-progress step index and the window
    /// deadline, since completing the sequence spans multiple `step` calls.
    RunAtomic(PrepId),
    Stuck(StuckReason),
}

fn current_budget(snapshot: &impl Snapshot, config: &PlannerConfig) -> FlagBudget {
    FlagBudget::from_snapshot(snapshot, config.known_flags.iter().copied())
}

fn carries_active_light(snapshot: &impl Snapshot, config: &PlannerConfig) -> bool {
    snapshot.inventory_all().contains(&config.light_source)
        && snapshot.flag(EntityRef::Object(config.light_source), FlagName::new("on"))
}

/// The room a given object is directly sitting in, walking up the container
/// chain if necessary (spec.md §4.1's `find_object_room`, generalized here
/// with the trivial "container's own location" resolver since planner-level
/// containers are all authored as living in a fixed room or being carried).
fn room_of(snapshot: &impl Snapshot, object: ObjectId) -> Option<RoomId> {
    let observer = Observer::new(snapshot);
    observer.find_object_room(object, |container| match snapshot.object_location(container) {
        Location::Room(room) => Some(room),
        _ => None,
    })
}

fn is_open(snapshot: &impl Snapshot, container: ObjectId) -> bool {
    snapshot.flag(EntityRef::Object(container), FlagName::new("open"))
}

fn is_dead(snapshot: &impl Snapshot, enemy: ObjectId) -> bool {
    snapshot.flag(EntityRef::Object(enemy), FlagName::new(format!("{}_dead", enemy.as_str())))
}

fn item_deposited(snapshot: &impl Snapshot, config: &PlannerConfig, treasure: ObjectId) -> bool {
    matches!(snapshot.object_location(treasure), Location::Container(c) if c == config.deposit_container)
}

pub fn select_action_for(
    goal: Goal,
    snapshot: &impl Snapshot,
    config: &PlannerConfig,
    tables: &StaticTables,
    catalog: &PrepCatalog,
) -> Decision {
    let decision = match goal {
        Goal::AtRoom(target) => at_room(target, snapshot, config, tables),
        Goal::HaveItem(item) => have_item(item, snapshot),
        Goal::ItemVisible(item) => item_visible(item, snapshot),
        Goal::FlagSet(flag) => flag_set(flag, snapshot, config, catalog),
        Goal::ItemDeposited(treasure) => item_deposited_goal(treasure, snapshot, config),
        Goal::KillEnemy(enemy) => kill_enemy(enemy, snapshot, config, tables),
        Goal::ContainerOpen(container) => container_open(container, snapshot),
        Goal::LanternOn => lantern_on(snapshot, config),
        Goal::AllTreasuresDeposited => all_treasures_deposited(snapshot, config),
        Goal::Win => win(snapshot, config),
    };
    log::debug!("select_action_for({goal}) -> {decision:?}");
    decision
}

/// What the engine should be in before the action `select_action_for` just
/// picked for `goal` is sent to it (spec.md §4.8's per-goal-category
/// precondition list). Most goals have nothing beyond "player alive", which
/// `check_preconditions` always checks regardless of what's returned here;
/// `KillEnemy` is the one category with a real pre-attack checklist.
pub fn expected_preconditions_for(
    goal: Goal,
    config: &PlannerConfig,
    tables: &StaticTables,
) -> verifier::ExpectedPreconditions {
    match goal {
        Goal::KillEnemy(enemy) if !config.is_cyclops(enemy) => {
            let room = config.enemy_room(enemy);
            verifier::ExpectedPreconditions {
                expected_room: room,
                requires_light: room.map(|r| tables.requires_light(r)).unwrap_or(false),
                requires_weapon: config.enemy_weapon(enemy),
                combat_ready: Some(enemy),
            }
        }
        _ => verifier::ExpectedPreconditions::default(),
    }
}

fn at_room(target: RoomId, snapshot: &impl Snapshot, config: &PlannerConfig, tables: &StaticTables) -> Decision {
    if snapshot.here() == target {
        return Decision::Satisfied;
    }

    let budget = current_budget(snapshot, config);
    let graph = build_graph(snapshot, config.rooms.iter().copied(), tables, &budget);
    let path = match shortest_path(&graph, snapshot.here(), target) {
        Ok(path) => path,
        Err(_) => return Decision::Stuck(StuckReason::NoPath { from: snapshot.here(), to: target }),
    };
    if path.is_empty() {
        return Decision::Satisfied;
    }

    let next_room = path.rooms[1];
    let entering_the_lantern_room = snapshot.object_location(config.light_source) == Location::Room(next_room);
    if tables.requires_light(next_room) && !carries_active_light(snapshot, config) && !entering_the_lantern_room {
        return Decision::Decompose(vec![Goal::LanternOn]);
    }

    let commands = path_to_commands(&path, snapshot);
    match commands.into_iter().next() {
        Some(action) => Decision::Action(action),
        None => Decision::Stuck(StuckReason::Unreachable(format!("path to {target} produced no commands"))),
    }
}

fn have_item(item: ObjectId, snapshot: &impl Snapshot) -> Decision {
    if snapshot.inventory_all().contains(&item) {
        return Decision::Satisfied;
    }

    match snapshot.object_location(item) {
        Location::Room(room) if room == snapshot.here() => Decision::Action(Action::Take { object: item }),
        Location::Room(room) => Decision::Decompose(vec![Goal::AtRoom(room)]),
        Location::Container(container) => {
            let container_here = matches!(snapshot.object_location(container), Location::Room(r) if r == snapshot.here())
                || snapshot.inventory_all().contains(&container);
            if container_here {
                if is_open(snapshot, container) {
                    Decision::Action(Action::Take { object: item })
                } else {
                    Decision::Action(Action::Open { object: container })
                }
            } else {
                match room_of(snapshot, container) {
                    Some(room) => Decision::Decompose(vec![Goal::AtRoom(room)]),
                    None => Decision::Stuck(StuckReason::Unreachable(format!("{item} is not reachable from here"))),
                }
            }
        }
        Location::Carried => Decision::Satisfied,
        Location::Limbo => Decision::Stuck(StuckReason::Unreachable(format!("{item} is in limbo"))),
    }
}

/// Weaker than `HaveItem`: satisfied as soon as the object is somewhere the
/// player can perceive it — carried, lying in the current room, or inside
/// an open container here — without picking it up. Used by preps that only
/// need to look at or read something (spec.md §3's Goal variant list).
fn item_visible(item: ObjectId, snapshot: &impl Snapshot) -> Decision {
    if snapshot.inventory_all().contains(&item) {
        return Decision::Satisfied;
    }
    match snapshot.object_location(item) {
        Location::Room(room) if room == snapshot.here() => Decision::Satisfied,
        Location::Room(room) => Decision::Decompose(vec![Goal::AtRoom(room)]),
        Location::Container(container) => {
            let container_here = matches!(snapshot.object_location(container), Location::Room(r) if r == snapshot.here())
                || snapshot.inventory_all().contains(&container);
            if container_here && is_open(snapshot, container) {
                Decision::Satisfied
            } else if container_here {
                Decision::Action(Action::Open { object: container })
            } else {
                match room_of(snapshot, container) {
                    Some(room) => Decision::Decompose(vec![Goal::AtRoom(room)]),
                    None => Decision::Stuck(StuckReason::Unreachable(format!("{item} is not reachable from here"))),
                }
            }
        }
        Location::Carried => Decision::Satisfied,
        Location::Limbo => Decision::Stuck(StuckReason::Unreachable(format!("{item} is in limbo"))),
    }
}

/// Satisfied once the global flag is set; otherwise finds a catalog prep
/// that produces it, satisfies that prep's own requirements as sub-goals,
/// gets the player to one of its locations, and finally submits its action
/// (spec.md §4.4's `PrepAction`; the Route Optimizer's `Prep` schedule entry
/// reduces to this goal per spec.md §2's data flow). `Combat` preps defer to
/// `KillEnemy`'s own rules rather than duplicating them here.
fn flag_set(flag: FlagName, snapshot: &impl Snapshot, config: &PlannerConfig, catalog: &PrepCatalog) -> Decision {
    if snapshot.flag(EntityRef::Global, flag) {
        return Decision::Satisfied;
    }

    let Some(prep) = catalog.all().find(|p| p.produces(flag)) else {
        return Decision::Stuck(StuckReason::Unreachable(format!("no catalog prep produces flag {flag}")));
    };

    if let PrepKind::Combat { target } = &prep.kind {
        return Decision::Decompose(vec![Goal::KillEnemy(*target)]);
    }

    for req in &prep.requires {
        match req {
            Requirement::Item(item) if !snapshot.inventory_all().contains(item) => {
                return Decision::Decompose(vec![Goal::HaveItem(*item)]);
            }
            Requirement::Flag(dep) if !snapshot.flag(EntityRef::Global, *dep) => {
                return Decision::Decompose(vec![Goal::FlagSet(*dep)]);
            }
            _ => {}
        }
    }

    if !prep.locations.contains(&snapshot.here()) {
        let Some(&destination) = prep.locations.first() else {
            return Decision::Stuck(StuckReason::Unreachable(format!("prep {} has no authored location", prep.id)));
        };
        return Decision::Decompose(vec![Goal::AtRoom(destination)]);
    }

    match &prep.kind {
        PrepKind::Atomic { .. } => Decision::RunAtomic(prep.id.clone()),
        _ => match &prep.action {
            Some(action) => Decision::Action(action.clone()),
            None => Decision::Stuck(StuckReason::Unreachable(format!("prep {} ({:?}) has no directly executable action", prep.id, prep.kind))),
        },
    }
}

fn item_deposited_goal(treasure: ObjectId, snapshot: &impl Snapshot, config: &PlannerConfig) -> Decision {
    if item_deposited(snapshot, config, treasure) {
        return Decision::Satisfied;
    }
    if !snapshot.inventory_all().contains(&treasure) {
        return Decision::Decompose(vec![Goal::HaveItem(treasure)]);
    }
    if snapshot.here() != config.deposit_room {
        return Decision::Decompose(vec![Goal::AtRoom(config.deposit_room)]);
    }
    if !is_open(snapshot, config.deposit_container) {
        return Decision::Decompose(vec![Goal::ContainerOpen(config.deposit_container)]);
    }
    Decision::Action(Action::PutIn { object: treasure, container: config.deposit_container })
}

fn kill_enemy(enemy: ObjectId, snapshot: &impl Snapshot, config: &PlannerConfig, tables: &StaticTables) -> Decision {
    if is_dead(snapshot, enemy) {
        return Decision::Satisfied;
    }

    let Some(enemy_room) = config.enemy_room(enemy) else {
        return Decision::Stuck(StuckReason::Unreachable(format!("no known room for {enemy}")));
    };

    if config.is_cyclops(enemy) {
        return if snapshot.here() != enemy_room {
            Decision::Decompose(vec![Goal::AtRoom(enemy_room)])
        } else {
            Decision::Action(Action::Say { word: "ulysses".to_string() })
        };
    }

    let Some(weapon) = config.enemy_weapon(enemy) else {
        return Decision::Stuck(StuckReason::Unreachable(format!("no known weapon for {enemy}")));
    };
    if !snapshot.inventory_all().contains(&weapon) {
        return Decision::Decompose(vec![Goal::HaveItem(weapon)]);
    }
    if tables.requires_light(enemy_room) && !carries_active_light(snapshot, config) {
        return Decision::Decompose(vec![Goal::LanternOn]);
    }
    if snapshot.here() != enemy_room {
        return Decision::Decompose(vec![Goal::AtRoom(enemy_room)]);
    }
    Decision::Action(Action::Attack { enemy, weapon })
}

fn container_open(container: ObjectId, snapshot: &impl Snapshot) -> Decision {
    if is_open(snapshot, container) {
        return Decision::Satisfied;
    }
    let here_or_carried = matches!(snapshot.object_location(container), Location::Room(r) if r == snapshot.here())
        || snapshot.inventory_all().contains(&container);
    if here_or_carried {
        return Decision::Action(Action::Open { object: container });
    }
    match room_of(snapshot, container) {
        Some(room) => Decision::Decompose(vec![Goal::AtRoom(room)]),
        None => Decision::Stuck(StuckReason::Unreachable(format!("{container} is not reachable from here"))),
    }
}

fn lantern_on(snapshot: &impl Snapshot, config: &PlannerConfig) -> Decision {
    if carries_active_light(snapshot, config) {
        return Decision::Satisfied;
    }
    if !snapshot.inventory_all().contains(&config.light_source) {
        return Decision::Decompose(vec![Goal::HaveItem(config.light_source)]);
    }
    Decision::Action(Action::TurnOn { object: config.light_source })
}

fn all_treasures_deposited(snapshot: &impl Snapshot, config: &PlannerConfig) -> Decision {
    match config.treasures.iter().find(|&&t| !item_deposited(snapshot, config, t)) {
        Some(&t) => Decision::Decompose(vec![Goal::ItemDeposited(t)]),
        None => Decision::Satisfied,
    }
}

fn win(snapshot: &impl Snapshot, config: &PlannerConfig) -> Decision {
    if snapshot.won() {
        return Decision::Satisfied;
    }
    if config.treasures.iter().any(|&t| !item_deposited(snapshot, config, t)) {
        return Decision::Decompose(vec![Goal::AllTreasuresDeposited]);
    }
    if snapshot.here() != config.victory_room {
        return Decision::Decompose(vec![Goal::AtRoom(config.victory_room)]);
    }
    // The final move once the treasures are home and the player is in the
    // victory room; the engine's own win check fires off the back of this
    // action (see engine-contract's `testkit` for the reference behavior).
    Decision::Action(Action::Wait)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::WorldBuilder;
    use engine_contract::{Direction, ExitSpec};
    use prepcatalog::PrepCatalog;
    use std::collections::HashMap as StdHashMap;

    fn empty_catalog() -> PrepCatalog {
        PrepCatalog::builder().build().unwrap()
    }

    fn config(rooms: Vec<RoomId>) -> PlannerConfig {
        PlannerConfig {
            rooms,
            known_flags: Vec::new(),
            victory_room: RoomId::new("victory"),
            deposit_room: RoomId::new("living_room"),
            deposit_container: ObjectId::new("trophy_case"),
            light_source: ObjectId::new("lantern"),
            treasures: Vec::new(),
            enemy_rooms: StdHashMap::new(),
            enemy_weapons: StdHashMap::new(),
            cyclops: None,
            max_turns: 1000,
        }
    }

    #[test]
    fn at_room_satisfied_when_already_there() {
        let room = RoomId::new("room");
        let (layout, state) = WorldBuilder::new().room(room, Default::default()).start_at(room).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let tables = StaticTables::new();
        let cfg = config(vec![room]);
        assert!(matches!(select_action_for(Goal::AtRoom(room), &snap, &cfg, &tables, &empty_catalog()), Decision::Satisfied));
    }

    #[test]
    fn at_room_emits_move_toward_target() {
        let a = RoomId::new("a");
        let b = RoomId::new("b");
        let mut exits = StdHashMap::new();
        exits.insert(Direction::new("east"), ExitSpec::Direct { to: b });
        let (layout, state) = WorldBuilder::new().room(a, exits).room(b, Default::default()).start_at(a).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let tables = StaticTables::new();
        let cfg = config(vec![a, b]);
        let decision = select_action_for(Goal::AtRoom(b), &snap, &cfg, &tables, &empty_catalog());
        assert!(matches!(decision, Decision::Action(Action::Go { direction }) if direction == Direction::new("east")));
    }

    #[test]
    fn at_room_reports_stuck_when_unreachable() {
        let a = RoomId::new("a");
        let isolated = RoomId::new("isolated");
        let (layout, state) = WorldBuilder::new().room(a, Default::default()).room(isolated, Default::default()).start_at(a).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let tables = StaticTables::new();
        let cfg = config(vec![a, isolated]);
        let decision = select_action_for(Goal::AtRoom(isolated), &snap, &cfg, &tables, &empty_catalog());
        assert!(matches!(decision, Decision::Stuck(StuckReason::NoPath { .. })));
    }

    #[test]
    fn have_item_takes_a_visible_object_in_the_current_room() {
        let room = RoomId::new("room");
        let egg = ObjectId::new("egg");
        let (layout, state) = WorldBuilder::new().room(room, Default::default()).start_at(room).object_in_room(egg, room).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let cfg = config(vec![room]);
        let tables = StaticTables::new();
        let decision = select_action_for(Goal::HaveItem(egg), &snap, &cfg, &tables, &empty_catalog());
        assert!(matches!(decision, Decision::Action(Action::Take { object }) if object == egg));
    }

    #[test]
    fn have_item_decomposes_into_at_room_when_elsewhere() {
        let here = RoomId::new("here");
        let there = RoomId::new("there");
        let egg = ObjectId::new("egg");
        let (layout, state) =
            WorldBuilder::new().room(here, Default::default()).room(there, Default::default()).start_at(here).object_in_room(egg, there).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let cfg = config(vec![here, there]);
        let tables = StaticTables::new();
        let decision = select_action_for(Goal::HaveItem(egg), &snap, &cfg, &tables, &empty_catalog());
        assert!(matches!(decision, Decision::Decompose(goals) if goals == vec![Goal::AtRoom(there)]));
    }

    #[test]
    fn kill_enemy_uses_say_ulysses_for_the_cyclops() {
        let room = RoomId::new("cyclops_room");
        let cyclops = ObjectId::new("cyclops");
        let (layout, state) = WorldBuilder::new().room(room, Default::default()).start_at(room).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let mut cfg = config(vec![room]);
        cfg.cyclops = Some(cyclops);
        cfg.enemy_rooms.insert(cyclops, room);
        let tables = StaticTables::new();
        let decision = select_action_for(Goal::KillEnemy(cyclops), &snap, &cfg, &tables, &empty_catalog());
        assert!(matches!(decision, Decision::Action(Action::Say { word }) if word == "ulysses"));
    }

    #[test]
    fn lantern_on_requires_having_it_first() {
        let room = RoomId::new("room");
        let (layout, state) = WorldBuilder::new().room(room, Default::default()).start_at(room).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let cfg = config(vec![room]);
        let decision = lantern_on(&snap, &cfg);
        assert!(matches!(decision, Decision::Decompose(goals) if goals == vec![Goal::HaveItem(ObjectId::new("lantern"))]));
    }

    #[test]
    fn flag_set_satisfied_when_already_true() {
        let room = RoomId::new("room");
        let (layout, state) =
            WorldBuilder::new().room(room, Default::default()).start_at(room).flag(EntityRef::Global, FlagName::new("rug_moved"), true).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let cfg = config(vec![room]);
        let tables = StaticTables::new();
        let decision = select_action_for(Goal::FlagSet(FlagName::new("rug_moved")), &snap, &cfg, &tables, &empty_catalog());
        assert!(matches!(decision, Decision::Satisfied));
    }

    #[test]
    fn flag_set_emits_the_producing_preps_action_once_in_place() {
        use prepcatalog::{Effect, PrepAction, PrepId, PrepKind};

        let room = RoomId::new("attic");
        let rug_moved = FlagName::new("rug_moved");
        let (layout, state) = WorldBuilder::new().room(room, Default::default()).start_at(room).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let cfg = config(vec![room]);
        let tables = StaticTables::new();

        let move_rug = PrepAction {
            id: PrepId::new("move_rug"),
            description: "move the rug".into(),
            locations: vec![room],
            requires: vec![],
            effect: Effect { immediate_flags: [rug_moved].into_iter().collect(), delayed: None },
            kind: PrepKind::Immediate,
            action: Some(Action::Move { object: ObjectId::new("rug") }),
        };
        let catalog = PrepCatalog::builder().prep(move_rug).build().unwrap();

        let decision = select_action_for(Goal::FlagSet(rug_moved), &snap, &cfg, &tables, &catalog);
        assert!(matches!(decision, Decision::Action(Action::Move { object }) if object == ObjectId::new("rug")));
    }

    #[test]
    fn flag_set_decomposes_into_prep_requirements_first() {
        use prepcatalog::{Effect, PrepAction, PrepId, PrepKind};

        let room = RoomId::new("temple");
        let bell_rung = FlagName::new("bell_rung");
        let (layout, state) = WorldBuilder::new().room(room, Default::default()).start_at(room).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let cfg = config(vec![room]);
        let tables = StaticTables::new();

        let ring_bell = PrepAction {
            id: PrepId::new("ring_bell"),
            description: "ring the bell".into(),
            locations: vec![room],
            requires: vec![Requirement::Item(ObjectId::new("bell"))],
            effect: Effect { immediate_flags: [bell_rung].into_iter().collect(), delayed: None },
            kind: PrepKind::Immediate,
            action: Some(Action::Ring { object: ObjectId::new("bell") }),
        };
        let catalog = PrepCatalog::builder().prep(ring_bell).build().unwrap();

        let decision = select_action_for(Goal::FlagSet(bell_rung), &snap, &cfg, &tables, &catalog);
        assert!(matches!(decision, Decision::Decompose(goals) if goals == vec![Goal::HaveItem(ObjectId::new("bell"))]));
    }

    #[test]
    fn item_visible_satisfied_by_sight_without_taking() {
        let room = RoomId::new("room");
        let inscription = ObjectId::new("inscription");
        let (layout, state) = WorldBuilder::new().room(room, Default::default()).start_at(room).object_in_room(inscription, room).build();
        let snap = engine_contract::testkit::InMemorySnapshot::new(layout, state);
        let decision = item_visible(inscription, &snap);
        assert!(matches!(decision, Decision::Satisfied));
    }

    #[test]
    fn expected_preconditions_for_kill_enemy_demands_its_weapon() {
        let room = RoomId::new("troll_room");
        let troll = ObjectId::new("troll");
        let sword = ObjectId::new("sword");
        let mut cfg = config(vec![room]);
        cfg.enemy_rooms.insert(troll, room);
        cfg.enemy_weapons.insert(troll, sword);
        let tables = StaticTables::new();
        let expected = expected_preconditions_for(Goal::KillEnemy(troll), &cfg, &tables);
        assert_eq!(expected.expected_room, Some(room));
        assert_eq!(expected.requires_weapon, Some(sword));
        assert_eq!(expected.combat_ready, Some(troll));
    }

    #[test]
    fn expected_preconditions_for_the_cyclops_is_unguarded() {
        let room = RoomId::new("cyclops_room");
        let cyclops = ObjectId::new("cyclops");
        let mut cfg = config(vec![room]);
        cfg.cyclops = Some(cyclops);
        cfg.enemy_rooms.insert(cyclops, room);
        let tables = StaticTables::new();
        let expected = expected_preconditions_for(Goal::KillEnemy(cyclops), &cfg, &tables);
        assert_eq!(expected.requires_weapon, None);
        assert_eq!(expected.combat_ready, None);
    }

    #[test]
    fn expected_preconditions_for_non_combat_goals_is_default() {
        let room = RoomId::new("room");
        let cfg = config(vec![room]);
        let tables = StaticTables::new();
        let expected = expected_preconditions_for(Goal::AtRoom(room), &cfg, &tables);
        assert!(expected.expected_room.is_none());
        assert!(!expected.requires_light);
        assert!(expected.requires_weapon.is_none());
        assert!(expected.combat_ready.is_none());
    }
}
