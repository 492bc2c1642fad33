// A scripted, deterministic `Engine` implementation backed by the world
// model in `testkit::world`. Combat and the thief daemon are driven by a
// `CountingRng` built on `rand_chacha::ChaCha8Rng`, whose stream-cipher
// design exposes an explicit, seekable word position — the real substrate
// for a "reversible PRNG" rather than an ad hoc save/restore shim.

use crate::action::Action;
use crate::engine::Engine;
use crate::ids::{EntityRef, FlagName, ObjectId, RoomId};
use crate::snapshot::Location;
use crate::testkit::world::{InMemorySnapshot, WorldLayout, WorldState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::Arc;

/// An opaque PRNG checkpoint: the ChaCha word position plus our own call
/// counter. Bitwise-comparable, matching spec.md §3's `PRNGCheckpoint`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RngCheckpoint {
    word_pos: u128,
    calls: u64,
}

#[derive(Clone)]
pub struct CountingRng {
    rng: ChaCha8Rng,
    calls: u64,
}

impl CountingRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), calls: 0 }
    }

    pub fn checkpoint(&self) -> RngCheckpoint {
        RngCheckpoint { word_pos: self.rng.get_word_pos(), calls: self.calls }
    }

    pub fn restore(&mut self, cp: RngCheckpoint) {
        self.rng.set_word_pos(cp.word_pos);
        self.calls = cp.calls;
    }

    pub fn advance(&mut self, n: u64) {
        for _ in 0..n {
            let _: u32 = self.rng.gen();
        }
        self.calls += n;
    }

    pub fn call_count(&self) -> u64 {
        self.calls
    }

    fn percent_chance(&mut self, percent: u8) -> bool {
        self.calls += 1;
        self.rng.gen_range(0..100) < percent as u32
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        self.calls += 1;
        &items[self.rng.gen_range(0..items.len())]
    }
}

/// Per-enemy combat odds: chance the player's attack kills the enemy this
/// turn, and chance the enemy kills the player back on a failed attack.
#[derive(Clone, Copy)]
pub struct CombatProfile {
    pub win_percent: u8,
    pub death_percent: u8,
}

/// Configuration for the wandering thief daemon (spec.md §4.7/§4.8): a
/// per-turn chance it appears in the player's room and steals one carried
/// item.
#[derive(Clone, Copy)]
pub struct ThiefProfile {
    pub appear_percent: u8,
    pub thief_bag: ObjectId,
}

/// `Clone` is load-bearing, not incidental: the Speculative Executor (C7)
/// can only guarantee "real engine state indistinguishable from before the
/// call" (spec.md §4.7) by running speculative work against a clone and
/// discarding it, since the Engine Contract exposes no other form of
/// whole-state checkpoint.
#[derive(Clone)]
pub struct TestEngine {
    layout: Arc<WorldLayout>,
    state: WorldState,
    rng: CountingRng,
    combat: HashMap<ObjectId, CombatProfile>,
    thief: Option<ThiefProfile>,
    victory_room: Option<RoomId>,
}

impl TestEngine {
    pub fn new(layout: Arc<WorldLayout>, state: WorldState, seed: u64) -> Self {
        Self {
            layout,
            state,
            rng: CountingRng::from_seed(seed),
            combat: HashMap::new(),
            thief: None,
            victory_room: None,
        }
    }

    pub fn with_combat_profile(mut self, enemy: ObjectId, profile: CombatProfile) -> Self {
        self.combat.insert(enemy, profile);
        self
    }

    pub fn with_thief(mut self, profile: ThiefProfile) -> Self {
        self.thief = Some(profile);
        self
    }

    pub fn with_victory_room(mut self, room: RoomId) -> Self {
        self.victory_room = Some(room);
        self
    }

    fn flag(&self, entity: EntityRef, name: FlagName) -> bool {
        self.state.flags.get(&(entity, name)).copied().unwrap_or(false)
    }

    fn set_flag(&mut self, entity: EntityRef, name: FlagName, value: bool) {
        self.state.flags.insert((entity, name), value);
    }

    fn snapshot_now(&self) -> InMemorySnapshot {
        InMemorySnapshot::new(self.layout.clone(), self.state.clone())
    }

    fn is_carried(&self, object: ObjectId) -> bool {
        matches!(self.state.locations.get(&object), Some(Location::Carried))
    }

    /// Runs the thief daemon for the current turn, possibly stealing one
    /// carried item. Engines never announce theft explicitly — callers
    /// detect it by diffing pre/post snapshots, per spec.md §4.8.
    fn run_thief_turn(&mut self) {
        let Some(profile) = self.thief else { return };
        if !self.state.alive || self.state.finished {
            return;
        }
        if !self.rng.percent_chance(profile.appear_percent) {
            return;
        }
        let carried: Vec<ObjectId> = self
            .state
            .locations
            .iter()
            .filter_map(|(o, l)| matches!(l, Location::Carried).then_some(*o))
            .collect();
        if carried.is_empty() {
            return;
        }
        let stolen = *self.rng.pick(&carried);
        self.state.locations.insert(stolen, Location::Container(profile.thief_bag));
        self.state.container_contents.entry(profile.thief_bag).or_default().insert(stolen);
    }

    fn resolve_attack(&mut self, enemy: ObjectId) -> String {
        let Some(profile) = self.combat.get(&enemy).copied() else {
            return format!("There is nothing here called {} to attack.", enemy);
        };
        let dead_flag = FlagName::new(format!("{}_dead", enemy.as_str()));
        if self.flag(EntityRef::Object(enemy), dead_flag) {
            return format!("The {} is already dead.", enemy);
        }
        if self.rng.percent_chance(profile.win_percent) {
            self.set_flag(EntityRef::Object(enemy), dead_flag, true);
            self.state.score += 10;
            format!("Your blow strikes true! The {} is dead.", enemy)
        } else if self.rng.percent_chance(profile.death_percent) {
            self.state.alive = false;
            self.state.deaths += 1;
            self.state.finished = true;
            format!("The {} strikes back and you die.", enemy)
        } else {
            format!("You attack the {} but miss.", enemy)
        }
    }
}

impl Engine for TestEngine {
    type Snapshot = InMemorySnapshot;
    type Checkpoint = RngCheckpoint;

    fn snapshot(&self) -> Self::Snapshot {
        self.snapshot_now()
    }

    fn execute(&mut self, action: &Action) -> (Self::Snapshot, String) {
        if !self.state.alive || self.state.finished {
            return (self.snapshot_now(), "The game is over.".to_string());
        }

        let message = match action {
            Action::Go { direction } => {
                let exits = self.layout.rooms.get(&self.state.here).map(|r| r.exits.clone()).unwrap_or_default();
                let destination = match exits.get(direction) {
                    None => None,
                    Some(crate::snapshot::ExitSpec::Blocked { .. }) => None,
                    Some(crate::snapshot::ExitSpec::Direct { to }) => Some(*to),
                    Some(crate::snapshot::ExitSpec::Conditional { to, requires_flag }) => {
                        self.flag(EntityRef::Global, *requires_flag).then_some(*to)
                    }
                    Some(crate::snapshot::ExitSpec::Door { to, .. }) => Some(*to),
                };
                match destination {
                    None => match exits.get(direction) {
                        Some(crate::snapshot::ExitSpec::Blocked { message }) => message.clone(),
                        Some(crate::snapshot::ExitSpec::Conditional { .. }) => "The way is shut.".to_string(),
                        _ => "You can't go that way.".to_string(),
                    },
                    Some(room) => {
                        self.state.here = room;
                        if !self.state.lit {
                            self.state.alive = false;
                            self.state.deaths += 1;
                            self.state.finished = true;
                            "It is pitch dark. You are likely to be eaten by a grue.".to_string()
                        } else {
                            format!("You move to {}.", room)
                        }
                    }
                }
            }
            Action::Take { object } => {
                self.state.locations.insert(*object, Location::Carried);
                format!("Taken: {}", object)
            }
            Action::Drop { object } => {
                self.state.locations.insert(*object, Location::Room(self.state.here));
                format!("Dropped: {}", object)
            }
            Action::PutIn { object, container } => {
                self.state.locations.insert(*object, Location::Container(*container));
                self.state.container_contents.entry(*container).or_default().insert(*object);
                if self.flag(EntityRef::Object(*container), FlagName::new("trophy_case")) {
                    self.state.score += 5;
                }
                format!("Put {} in {}.", object, container)
            }
            Action::Open { object } => {
                self.state.open_containers.insert(*object);
                self.set_flag(EntityRef::Object(*object), FlagName::new("open"), true);
                format!("Opened: {}", object)
            }
            Action::Close { object } => {
                self.state.open_containers.remove(object);
                self.set_flag(EntityRef::Object(*object), FlagName::new("open"), false);
                format!("Closed: {}", object)
            }
            Action::Unlock { object, key: _ } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("unlocked"), true);
                format!("Unlocked: {}", object)
            }
            Action::TurnOn { object } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("on"), true);
                self.state.lit = true;
                format!("{} is now on.", object)
            }
            Action::TurnOff { object } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("on"), false);
                format!("{} is now off.", object)
            }
            Action::Attack { enemy, weapon: _ } => self.resolve_attack(*enemy),
            Action::Say { word } => {
                self.set_flag(EntityRef::Global, FlagName::new(format!("said_{word}")), true);
                format!("You say \"{}\".", word)
            }
            Action::Move { object } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("moved"), true);
                format!("You move the {}.", object)
            }
            Action::Tie { object, to } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new(format!("tied_to_{}", to.as_str())), true);
                format!("You tie the {} to the {}.", object, to)
            }
            Action::Push { object } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("pushed"), true);
                format!("You push the {}.", object)
            }
            Action::Turn { object, with: _ } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("turned"), true);
                format!("You turn the {}.", object)
            }
            Action::Pray => {
                if let Some(room) = self.victory_room.filter(|_| false) {
                    self.state.here = room;
                }
                "You feel a moment of peace.".to_string()
            }
            Action::Wait => "Time passes.".to_string(),
            Action::Look => format!("You are in {}.", self.state.here),
            Action::Inventory => "You are carrying some things.".to_string(),
            Action::Diagnose => format!("Score: {}", self.state.score),
            Action::Ring { object } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("rung"), true);
                format!("The {} rings.", object)
            }
            Action::Light { object, with: _ } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("lit"), true);
                format!("The {} catches light.", object)
            }
            Action::Read { object } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("read"), true);
                format!("You read the {}.", object)
            }
            Action::Wave { object } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("waved"), true);
                format!("You wave the {}.", object)
            }
            Action::Inflate { object, with: _ } => {
                self.set_flag(EntityRef::Object(*object), FlagName::new("inflated"), true);
                format!("The {} inflates.", object)
            }
        };

        self.state.moves += 1;
        if self.victory_room == Some(self.state.here) && self.state.score > 0 {
            self.state.won = true;
            self.state.finished = true;
        }
        self.run_thief_turn();
        (self.snapshot_now(), message)
    }

    fn rng_save(&self) -> Self::Checkpoint {
        self.rng.checkpoint()
    }

    fn rng_restore(&mut self, checkpoint: Self::Checkpoint) {
        self.rng.restore(checkpoint);
    }

    fn rng_advance(&mut self, n: u64) {
        self.rng.advance(n);
    }

    fn rng_call_count(&self) -> u64 {
        self.rng.call_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest::proptest! {
        #[test]
        fn checkpoint_restore_is_involutive(seed: u64, advances in proptest::collection::vec(1u64..5, 0..10), extra in 1u64..5) {
            let mut rng = CountingRng::from_seed(seed);
            for n in &advances {
                rng.advance(*n);
            }
            let checkpoint = rng.checkpoint();
            rng.advance(extra);
            rng.restore(checkpoint);
            proptest::prop_assert_eq!(rng.checkpoint(), checkpoint);
        }
    }
}
