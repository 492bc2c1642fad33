//! `zorkplan`: the top-level facade wiring C1-C8 into one `Session`
//! (SPEC_FULL.md §10). This crate owns no planning logic of its own — it
//! constructs the static tables, holds the `Engine` handle, and drives the
//! Reactive Planner one step (or to completion) at a time, plus a thin
//! recovery hook onto the Verifier's strategy selection.

pub use engine_contract;
pub use navgraph;
pub use observer;
pub use planner;
pub use prepcatalog;
pub use routeopt;
pub use speculative;
pub use verifier;

use engine_contract::{Action, Engine, StaticTables};
use navgraph::FlagBudget;
use planner::{Goal, PlannerConfig, PlannerState, Status, TraceEntry, TraceMask};
use prepcatalog::PrepCatalog;
use routeopt::{Schedule, ScheduleEntry};
use verifier::{RecoveryContext, RecoveryStrategy, VerifierError};

/// What `Session::recover` actually did to get the planner moving again.
#[derive(Clone, Debug, PartialEq)]
pub enum RecoveryOutcome {
    /// The planner's top goal was replaced; `Session::status` is `Running`.
    Retargeted(Goal),
    /// A single `Wait` was submitted to the engine; the caller should step
    /// the planner again to see whether the situation has changed.
    Waited,
}

/// Owns an `Engine` implementation, the planner-owned static tables, and a
/// running `PlannerState`. One `Session` corresponds to one playthrough; per
/// spec.md §5 the engine is not re-entrant, so only one `Session` may wrap a
/// given engine at a time.
pub struct Session<E: Engine> {
    engine: E,
    tables: StaticTables,
    catalog: PrepCatalog,
    config: PlannerConfig,
    planner: PlannerState,
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E, tables: StaticTables, catalog: PrepCatalog, config: PlannerConfig, root_goal: Goal, trace_mask: TraceMask) -> Self {
        let planner = PlannerState::new(root_goal, trace_mask);
        Self { engine, tables, catalog, config, planner }
    }

    pub fn status(&self) -> &Status {
        self.planner.status()
    }

    pub fn turn(&self) -> u32 {
        self.planner.turn()
    }

    pub fn trace(&self) -> &[TraceEntry] {
        self.planner.trace()
    }

    pub fn goal_stack(&self) -> &[Goal] {
        self.planner.goal_stack()
    }

    /// Adds a newly-discovered room to the navigation graph's node set
    /// (spec.md §6: `Snapshot` has no "list every room" accessor, so the
    /// room graph is only ever as complete as what the planner has been
    /// told about — a genuinely partial map, not a simplification).
    pub fn learn_room(&mut self, room: engine_contract::RoomId) {
        if !self.config.rooms.contains(&room) {
            self.config.rooms.push(room);
        }
    }

    pub fn snapshot(&self) -> E::Snapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// One planner step (spec.md §4.6's five numbered rules).
    pub fn step(&mut self) -> Status {
        self.planner.step(&mut self.engine, &self.config, &self.tables, &self.catalog)
    }

    /// Drives `step` until a terminal status, capping at `max_turns`
    /// (spec.md §10: `Session::run(max_turns) -> Status`).
    pub fn run(&mut self, max_turns: u32) -> Status {
        self.config.max_turns = max_turns;
        loop {
            let status = self.step();
            if !matches!(status, Status::Running) {
                return status;
            }
        }
    }

    /// Reduces one `Schedule` entry to the `Goal`(s) that accomplish it, per
    /// spec.md §2's C5 -> C6 hand-off. A `Prep`/`AtomicSequence` entry
    /// reduces to whichever flag the named prep produces (or, for a combat
    /// prep, to killing its target directly); entries with no catalog match
    /// are skipped rather than panicking, since a schedule built against a
    /// stale catalog shouldn't crash a playthrough.
    fn goals_for_entry(&self, entry: &ScheduleEntry) -> Vec<Goal> {
        match entry {
            ScheduleEntry::Move { to } => vec![Goal::AtRoom(*to)],
            ScheduleEntry::Prep { id } | ScheduleEntry::AtomicSequence { id, .. } => {
                let Some(prep) = self.catalog.get(id) else { return Vec::new() };
                if let prepcatalog::PrepKind::Combat { target } = &prep.kind {
                    return vec![Goal::KillEnemy(*target)];
                }
                let flag = prep.effect.immediate_flags.iter().next().copied().or(prep.effect.delayed.map(|(f, _)| f));
                flag.map(Goal::FlagSet).into_iter().collect()
            }
            ScheduleEntry::Collect { treasure } => vec![Goal::HaveItem(*treasure)],
            ScheduleEntry::DepositAll => vec![Goal::AllTreasuresDeposited],
            ScheduleEntry::ParallelWork { treasures, .. } => {
                treasures.iter().map(|t| Goal::HaveItem(*t)).collect()
            }
        }
    }

    /// Feeds an offline `Schedule` (C5's output) to the Reactive Planner one
    /// entry at a time, per spec.md §2's data flow: "The Route Optimizer
    /// produces an offline schedule; the Reactive Planner reduces each
    /// schedule entry to a sub-goal and executes it reactively." Each entry
    /// is reduced to one or more `Goal`s, pursued to completion before the
    /// next entry is considered, and stops at the first non-`Complete`
    /// status (a `Stuck`/`Dead`/`Timeout` mid-schedule is the caller's to
    /// recover from, same as any other goal).
    pub fn run_schedule(&mut self, schedule: &Schedule) -> Status {
        for (i, entry) in schedule.iter().enumerate() {
            for goal in self.goals_for_entry(entry) {
                self.planner.pursue(goal);
                let status = self.planner.run_to_completion(&mut self.engine, &self.config, &self.tables, &self.catalog);
                if !matches!(status, Status::Complete) {
                    log::warn!("schedule entry {i}/{} left the planner in {status:?}", schedule.entries.len());
                    return status;
                }
            }
        }
        log::info!("schedule of {} entries completed", schedule.entries.len());
        Status::Complete
    }

    /// Resolves a `Stuck` status by choosing a `RecoveryStrategy` (C8, spec
    /// §4.8) and replacing the planner's top goal, or burning a turn for
    /// `Wait`. A no-op (returns `Ok(None)`) when the planner isn't stuck.
    pub fn recover(&mut self, ctx: &RecoveryContext) -> Result<Option<RecoveryOutcome>, VerifierError> {
        if !matches!(self.planner.status(), Status::Stuck(_)) {
            return Ok(None);
        }

        let snapshot = self.engine.snapshot();
        let budget = FlagBudget::from_snapshot(&snapshot, self.config.known_flags.iter().copied());
        let strategy = verifier::choose_strategy(&snapshot, &self.tables, &budget, self.config.rooms.iter().copied(), ctx)?;

        log::info!("recovering from {:?} with strategy {strategy:?}", self.planner.status());
        let outcome = match strategy {
            RecoveryStrategy::Reroute { to, .. } => RecoveryOutcome::Retargeted(Goal::AtRoom(to)),
            RecoveryStrategy::WeaponPickup { weapon } => RecoveryOutcome::Retargeted(Goal::HaveItem(weapon)),
            RecoveryStrategy::ItemRecovery { item, .. } => RecoveryOutcome::Retargeted(Goal::HaveItem(item)),
            RecoveryStrategy::EngageThief { thief } => RecoveryOutcome::Retargeted(Goal::KillEnemy(thief)),
            RecoveryStrategy::Wait => {
                self.engine.execute(&Action::Wait);
                RecoveryOutcome::Waited
            }
        };

        if let RecoveryOutcome::Retargeted(goal) = outcome {
            self.planner.retarget(goal);
        }
        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::{TestEngine, WorldBuilder};
    use engine_contract::{Direction, ExitSpec, ObjectId, RoomId, Snapshot};
    use std::collections::HashMap;

    fn config(rooms: Vec<RoomId>) -> PlannerConfig {
        PlannerConfig {
            rooms,
            known_flags: Vec::new(),
            victory_room: RoomId::new("victory"),
            deposit_room: RoomId::new("living_room"),
            deposit_container: ObjectId::new("trophy_case"),
            light_source: ObjectId::new("lantern"),
            treasures: Vec::new(),
            enemy_rooms: HashMap::new(),
            enemy_weapons: HashMap::new(),
            cyclops: None,
            max_turns: 100,
        }
    }

    #[test]
    fn session_runs_a_corridor_to_completion() {
        let a = RoomId::new("a");
        let b = RoomId::new("b");
        let mut exits = HashMap::new();
        exits.insert(Direction::new("east"), ExitSpec::Direct { to: b });
        let (layout, state) = WorldBuilder::new().room(a, exits).room(b, Default::default()).start_at(a).build();
        let engine = TestEngine::new(layout, state, 7);
        let tables = StaticTables::new();
        let catalog = PrepCatalog::builder().build().unwrap();
        let cfg = config(vec![a, b]);
        let mut session = Session::new(engine, tables, catalog, cfg, Goal::AtRoom(b), TraceMask::NONE);
        let status = session.run(20);
        assert_eq!(status, Status::Complete);
        assert_eq!(session.snapshot().here(), b);
    }

    #[test]
    fn recover_retargets_once_an_alternate_room_is_learned() {
        let a = RoomId::new("a");
        let troll_room = RoomId::new("troll_room");
        let alt = RoomId::new("alt");
        let destination = RoomId::new("destination");
        let mut a_exits = HashMap::new();
        a_exits.insert(Direction::new("n"), ExitSpec::Direct { to: troll_room });
        a_exits.insert(Direction::new("e"), ExitSpec::Direct { to: alt });
        let mut alt_exits = HashMap::new();
        alt_exits.insert(Direction::new("e"), ExitSpec::Direct { to: destination });
        let (layout, state) = WorldBuilder::new()
            .room(a, a_exits)
            .room(troll_room, Default::default())
            .room(alt, alt_exits)
            .room(destination, Default::default())
            .start_at(a)
            .build();
        let engine = TestEngine::new(layout, state, 3);
        let tables = StaticTables::new();
        // `alt` is not yet a known room: the only known route is through
        // `troll_room`, a dead end, so the destination is genuinely
        // unreachable with the current map.
        let cfg = config(vec![a, troll_room, destination]);
        let catalog = PrepCatalog::builder().build().unwrap();
        let mut session = Session::new(engine, tables, catalog, cfg, Goal::AtRoom(destination), TraceMask::NONE);
        let status = session.run(5);
        assert!(matches!(status, Status::Stuck(_)));

        session.learn_room(alt);
        let ctx = RecoveryContext {
            blocked_room: Some(troll_room),
            destination: Some(destination),
            known_weapons: Vec::new(),
            thief: None,
            thief_bag: None,
            wanted_from_bag: Vec::new(),
        };
        let outcome = session.recover(&ctx).unwrap();
        assert_eq!(outcome, Some(RecoveryOutcome::Retargeted(Goal::AtRoom(destination))));
        let status = session.run(20);
        assert_eq!(status, Status::Complete);
        assert_eq!(session.snapshot().here(), destination);
    }

    #[test]
    fn run_schedule_reduces_a_move_and_a_prep_entry_in_order() {
        use engine_contract::FlagName;
        use prepcatalog::{Effect, PrepAction, PrepId, PrepKind};
        use routeopt::ScheduleEntry;
        use std::collections::HashSet;

        let a = RoomId::new("a");
        let b = RoomId::new("b");
        let mut exits = HashMap::new();
        exits.insert(Direction::new("east"), ExitSpec::Direct { to: b });
        let (layout, state) = WorldBuilder::new().room(a, exits).room(b, Default::default()).start_at(a).build();
        let engine = TestEngine::new(layout, state, 7);
        let tables = StaticTables::new();

        let mut produced = HashSet::new();
        produced.insert(FlagName::new("candles_lit"));
        let light_candles = PrepAction {
            id: PrepId::new("light_candles"),
            description: "light the candles".into(),
            locations: vec![b],
            requires: Vec::new(),
            effect: Effect { immediate_flags: produced, delayed: None },
            kind: PrepKind::Immediate,
            action: Some(Action::Wait),
        };
        let catalog = PrepCatalog::builder().prep(light_candles).build().unwrap();

        let cfg = config(vec![a, b]);
        let mut session = Session::new(engine, tables, catalog, cfg, Goal::Win, TraceMask::NONE);

        let mut schedule = Schedule::default();
        schedule.push(ScheduleEntry::Move { to: b });
        schedule.push(ScheduleEntry::Prep { id: PrepId::new("light_candles") });

        let status = session.run_schedule(&schedule);
        assert_eq!(status, Status::Complete);
        assert_eq!(session.snapshot().here(), b);
        assert!(session.snapshot().flag(engine_contract::EntityRef::Global, FlagName::new("candles_lit")));
    }
}
