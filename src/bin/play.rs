//! A thin demonstration binary: builds a tiny in-memory world with the
//! testkit, wires it into a `Session`, drives it to completion, and prints
//! the outcome. Not part of the core crate (same spirit as spec.md §1's
//! "out of scope: CLI/parser front end") — this exists only to show the
//! eight crates working together end to end.

use engine_contract::testkit::{TestEngine, WorldBuilder};
use engine_contract::{Direction, EntityRef, ExitSpec, FlagName, ObjectId, RoomId, StaticTables};
use planner::{Goal, PlannerConfig, TraceMask};
use prepcatalog::PrepCatalog;
use std::collections::HashMap;
use zorkplan::Session;

fn build_world() -> (std::sync::Arc<engine_contract::testkit::WorldLayout>, engine_contract::testkit::WorldState) {
    let west_of_house = RoomId::new("west_of_house");
    let living_room = RoomId::new("living_room");
    let forest = RoomId::new("forest");
    let egg = ObjectId::new("egg");
    let trophy_case = ObjectId::new("trophy_case");

    let mut west_exits = HashMap::new();
    west_exits.insert(Direction::new("east"), ExitSpec::Direct { to: living_room });
    let mut living_exits = HashMap::new();
    living_exits.insert(Direction::new("west"), ExitSpec::Direct { to: west_of_house });
    living_exits.insert(Direction::new("north"), ExitSpec::Direct { to: forest });
    let mut forest_exits = HashMap::new();
    forest_exits.insert(Direction::new("south"), ExitSpec::Direct { to: living_room });

    WorldBuilder::new()
        .room(west_of_house, west_exits)
        .room(living_room, living_exits)
        .room(forest, forest_exits)
        .start_at(west_of_house)
        .object_in_room(egg, forest)
        .object_in_room(trophy_case, living_room)
        .flag(EntityRef::Object(trophy_case), FlagName::new("trophy_case"), true)
        .build()
}

fn main() {
    env_logger::init();

    let west_of_house = RoomId::new("west_of_house");
    let living_room = RoomId::new("living_room");
    let forest = RoomId::new("forest");
    let egg = ObjectId::new("egg");
    let trophy_case = ObjectId::new("trophy_case");
    let lantern = ObjectId::new("lantern");

    let (layout, state) = build_world();
    let engine = TestEngine::new(layout, state, 42);
    let tables = StaticTables::new();
    let catalog = PrepCatalog::builder().build().expect("empty catalog is always valid");

    let config = PlannerConfig {
        rooms: vec![west_of_house, living_room, forest],
        known_flags: Vec::new(),
        victory_room: living_room,
        deposit_room: living_room,
        deposit_container: trophy_case,
        light_source: lantern,
        treasures: vec![egg],
        enemy_rooms: HashMap::new(),
        enemy_weapons: HashMap::new(),
        cyclops: None,
        max_turns: 200,
    };

    let mut session = Session::new(engine, tables, catalog, config, Goal::Win, TraceMask::ALL);

    let status = session.run(200);

    println!("final status: {status:?}");
    println!("turns taken: {}", session.turn());
    for entry in session.trace() {
        println!("[turn {:>3}] {} :: {}", entry.turn, entry.goal, entry.message);
    }

    let snapshot = session.snapshot();
    println!("score: {}", engine_contract::Snapshot::score(&snapshot));
}
