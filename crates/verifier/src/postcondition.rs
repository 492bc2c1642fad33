// Post-condition verification (spec.md §4.8): diffs `(pre, post)` snapshots
// against the action's expected effect. Each action family gets a
// dedicated verifier, per spec.md's list: Move, Take, Drop, Open, Close,
// TurnOn, TurnOff, Combat, PutIn.

use crate::side_effects::{detect_side_effects, SideEffects};
use engine_contract::{Action, EntityRef, FlagName, Location, ObjectId, RoomId, Snapshot};

#[derive(Clone, Debug)]
pub struct VerifyResult {
    pub success: bool,
    pub expected: String,
    pub actual: String,
    pub side_effects: SideEffects,
}

/// Dispatches to the action-specific verifier, per spec.md §4.8. `pre`/
/// `post` are the snapshots straddling the one action that was executed.
pub fn verify_action(action: &Action, pre: &impl Snapshot, post: &impl Snapshot) -> VerifyResult {
    let side_effects = detect_side_effects(pre, post);
    let (success, expected, actual) = match action {
        Action::Go { .. } => verify_move(pre, post),
        Action::Take { object } => verify_take(*object, post),
        Action::Drop { object } => verify_drop(*object, pre, post),
        Action::PutIn { object, container } => verify_put_in(*object, *container, post),
        Action::Open { object } => verify_flag_set(*object, FlagName::new("open"), post),
        Action::Close { object } => verify_flag_unset(*object, FlagName::new("open"), post),
        Action::TurnOn { object } => verify_flag_set(*object, FlagName::new("on"), post),
        Action::TurnOff { object } => verify_flag_unset(*object, FlagName::new("on"), post),
        Action::Attack { enemy, .. } => verify_combat(*enemy, pre, post),
        _ => (true, "no dedicated verifier for this action".to_string(), "assumed success".to_string()),
    };
    VerifyResult { success, expected, actual, side_effects }
}

fn verify_move(pre: &impl Snapshot, post: &impl Snapshot) -> (bool, String, String) {
    let moved = pre.here() != post.here();
    (moved, "player's room changes".into(), format!("{} -> {}", pre.here(), post.here()))
}

fn verify_take(object: ObjectId, post: &impl Snapshot) -> (bool, String, String) {
    // Spec.md §8 property 8: for every successful Take, the object is
    // carried and `object_location` reports `Carried`.
    let carried = post.inventory().contains(&object) && matches!(post.object_location(object), Location::Carried);
    (carried, format!("{object} carried"), format!("located at {:?}", post.object_location(object)))
}

fn verify_drop(object: ObjectId, pre: &impl Snapshot, post: &impl Snapshot) -> (bool, String, String) {
    let dropped = matches!(post.object_location(object), Location::Room(r) if r == post.here());
    (dropped, format!("{object} left in {}", pre.here()), format!("located at {:?}", post.object_location(object)))
}

fn verify_put_in(object: ObjectId, container: ObjectId, post: &impl Snapshot) -> (bool, String, String) {
    let placed = matches!(post.object_location(object), Location::Container(c) if c == container);
    (placed, format!("{object} inside {container}"), format!("located at {:?}", post.object_location(object)))
}

fn verify_flag_set(object: ObjectId, flag: FlagName, post: &impl Snapshot) -> (bool, String, String) {
    let set = post.flag(EntityRef::Object(object), flag);
    (set, format!("{flag} set on {object}"), format!("flag is {set}"))
}

fn verify_flag_unset(object: ObjectId, flag: FlagName, post: &impl Snapshot) -> (bool, String, String) {
    let unset = !post.flag(EntityRef::Object(object), flag);
    (unset, format!("{flag} unset on {object}"), format!("flag is {}", !unset))
}

fn verify_combat(enemy: ObjectId, pre: &impl Snapshot, post: &impl Snapshot) -> (bool, String, String) {
    let dead_flag = FlagName::new(format!("{}_dead", enemy.as_str()));
    let killed = post.flag(EntityRef::Object(enemy), dead_flag);
    let died = pre.alive() && !post.alive();
    // A combat action "succeeds" if it killed the enemy or at least didn't
    // kill the player; a miss that leaves both combatants standing is not
    // a verification failure, just a continued fight.
    let success = killed || post.alive();
    (success, format!("{enemy} dead or player survives"), format!("enemy_dead={killed} player_died={died}"))
}

/// `Open`/`Close` round-trip check for spec.md §8's idempotence property:
/// opening then closing restores the container's `:open` flag to its
/// original value.
pub fn open_close_round_trips(container: ObjectId, before: &impl Snapshot, after: &impl Snapshot) -> bool {
    before.flag(EntityRef::Object(container), FlagName::new("open")) == after.flag(EntityRef::Object(container), FlagName::new("open"))
}

pub fn room_of(object: ObjectId, snapshot: &impl Snapshot) -> Option<RoomId> {
    match snapshot.object_location(object) {
        Location::Room(room) => Some(room),
        _ => None,
    }
}
