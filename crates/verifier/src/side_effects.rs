// Side-effect detection (spec.md §4.8): diffs a pre/post snapshot pair for
// effects the action didn't itself cause — theft by the thief, damage,
// death. Used after every action, not just the ones the planner targeted.

use engine_contract::{EntityRef, FlagName, Location, ObjectId, Snapshot};
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideEffects {
    /// Carried objects present in `pre` but no longer carried in `post`,
    /// and not accounted for by a deliberate Drop/PutIn this turn.
    pub stolen: Vec<ObjectId>,
    pub player_died: bool,
    pub score_changed: Option<(i64, i64)>,
}

impl SideEffects {
    pub fn is_empty(&self) -> bool {
        self.stolen.is_empty() && !self.player_died && self.score_changed.is_none()
    }
}

/// Compares `pre` and `post` for incidental effects, per spec.md §4.8's
/// list: "compare inventory contents for theft, ... death transition".
///
/// Strength deltas and lantern-fuel-drop detection are not implemented:
/// the Observation API (`Snapshot`) exposes no strength or fuel accessor,
/// so there is nothing to diff against.
pub fn detect_side_effects(pre: &impl Snapshot, post: &impl Snapshot) -> SideEffects {
    let before: HashSet<ObjectId> = pre.inventory();
    let after: HashSet<ObjectId> = post.inventory();
    let stolen: Vec<ObjectId> = before.difference(&after).copied().collect();

    let player_died = pre.alive() && !post.alive();
    let score_changed = if pre.score() != post.score() { Some((pre.score(), post.score())) } else { None };

    SideEffects { stolen, player_died, score_changed }
}

/// Whether `object` vanished from the player's inventory between `pre` and
/// `post` without ending up dropped in the current room or placed in a
/// container the player still holds — the signature of a theft rather than
/// a deliberate Drop/PutIn.
pub fn looks_like_theft(object: ObjectId, pre: &impl Snapshot, post: &impl Snapshot) -> bool {
    let was_carried = pre.inventory().contains(&object);
    let still_carried = post.inventory().contains(&object);
    if !was_carried || still_carried {
        return false;
    }
    match post.object_location(object) {
        Location::Room(room) => room != post.here(),
        Location::Container(_) => true,
        Location::Carried | Location::Limbo => false,
    }
}

/// Whether the thief's presence flag (`thief_here`) is set in the current
/// room, used by the thief monitor to correlate a theft with an encounter.
pub fn thief_present(snapshot: &impl Snapshot) -> bool {
    snapshot.flag(EntityRef::Room(snapshot.here()), FlagName::new("thief_here"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::{TestEngine, ThiefProfile, WorldBuilder};
    use engine_contract::{Action, Engine};

    #[test]
    fn detects_player_death() {
        let troll = engine_contract::ObjectId::new("troll");
        let (layout, state) = WorldBuilder::new()
            .room(engine_contract::RoomId::new("room"), Default::default())
            .start_at(engine_contract::RoomId::new("room"))
            .build();
        let mut engine = TestEngine::new(layout, state, 1).with_combat_profile(
            troll,
            engine_contract::testkit::CombatProfile { win_percent: 0, death_percent: 100 },
        );
        let pre = engine.snapshot();
        let (post, _) = engine.execute(&Action::Attack { enemy: troll, weapon: engine_contract::ObjectId::new("sword") });
        let effects = detect_side_effects(&pre, &post);
        assert!(effects.player_died);
    }

    #[test]
    fn no_change_is_empty() {
        let (layout, state) = WorldBuilder::new()
            .room(engine_contract::RoomId::new("room"), Default::default())
            .start_at(engine_contract::RoomId::new("room"))
            .build();
        let mut engine = TestEngine::new(layout, state, 1);
        let pre = engine.snapshot();
        let (post, _) = engine.execute(&Action::Look);
        assert!(detect_side_effects(&pre, &post).is_empty());
    }

    #[test]
    fn detects_theft_of_a_carried_item() {
        let egg = engine_contract::ObjectId::new("egg");
        let (layout, state) = WorldBuilder::new()
            .room(engine_contract::RoomId::new("room"), Default::default())
            .start_at(engine_contract::RoomId::new("room"))
            .object_carried(egg)
            .build();
        let mut engine = TestEngine::new(layout, state, 1)
            .with_thief(ThiefProfile { appear_percent: 100, thief_bag: engine_contract::ObjectId::new("thief_bag") });
        let pre = engine.snapshot();
        let (post, _) = engine.execute(&Action::Wait);
        let effects = detect_side_effects(&pre, &post);
        assert_eq!(effects.stolen, vec![egg]);
    }
}
