// Burn-sequence search (spec.md §4.7): short sequences of RNG-cheap
// actions (wait/look/inventory) that still let the thief daemon consume
// RNG each turn, searched for a combination that sets up a winning combat
// roll.

use crate::combat::{find_winning_offset, simulate_combat, CombatOutcome, WinningOffset};
use engine_contract::{Action, Engine, ObjectId};

const SAFE_ACTIONS: [Action; 3] = [Action::Wait, Action::Look, Action::Inventory];

/// A combat plan found via burn-sequence search: the safe actions to run
/// first, then the RNG offset/turn count of the winning fight that follows.
#[derive(Clone, Debug)]
pub struct BurnPlan {
    pub burn: Vec<Action>,
    pub winning_offset: WinningOffset,
}

/// Enumerates every sequence of safe actions of length `0..=max_burn`
/// (spec.md §4.7); for each, speculatively executes it, then searches for a
/// winning RNG offset. Returns the first plan found, preferring shorter
/// burns (checked in increasing length order) and, within a length, the
/// minimum-turn winner.
pub fn find_winning_combat_plan<E>(
    engine: &E,
    enemy: ObjectId,
    weapon: ObjectId,
    max_burn: usize,
    max_offset: u64,
    max_turns: u32,
) -> Option<BurnPlan>
where
    E: Engine + Clone,
{
    for length in 0..=max_burn {
        for burn in sequences_of_length(length) {
            let mut trial = engine.clone();
            for action in &burn {
                trial.execute(action);
            }
            if let Some(winning_offset) = find_winning_offset(&trial, enemy, weapon, max_offset, max_turns) {
                log::info!("found winning combat plan against {enemy}: burn length {length}, offset {}", winning_offset.offset);
                return Some(BurnPlan { burn, winning_offset });
            }
        }
    }
    log::warn!("no winning combat plan against {enemy} within burn length {max_burn}");
    None
}

fn sequences_of_length(length: usize) -> Vec<Vec<Action>> {
    if length == 0 {
        return vec![Vec::new()];
    }
    let mut sequences = vec![Vec::new()];
    for _ in 0..length {
        let mut next = Vec::with_capacity(sequences.len() * SAFE_ACTIONS.len());
        for seq in &sequences {
            for action in &SAFE_ACTIONS {
                let mut extended = seq.clone();
                extended.push(action.clone());
                next.push(extended);
            }
        }
        sequences = next;
    }
    sequences
}

/// Checks whether the burn-then-combat plan actually wins when replayed
/// once more against `engine` (used as a final verification step before the
/// Reactive Planner commits to executing it for real).
pub fn verify_plan<E>(engine: &E, plan: &BurnPlan, enemy: ObjectId, weapon: ObjectId, max_turns: u32) -> bool
where
    E: Engine + Clone,
{
    let mut trial = engine.clone();
    for action in &plan.burn {
        trial.execute(action);
    }
    trial.rng_advance(plan.winning_offset.offset);
    simulate_combat(&trial, enemy, weapon, max_turns).outcome == CombatOutcome::Win
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::{CombatProfile, TestEngine, WorldBuilder};
    use engine_contract::RoomId;

    fn engine_with_troll(seed: u64) -> TestEngine {
        let (layout, state) = WorldBuilder::new()
            .room(RoomId::new("troll_room"), Default::default())
            .start_at(RoomId::new("troll_room"))
            .object_carried(ObjectId::new("sword"))
            .build();
        TestEngine::new(layout, state, seed)
            .with_combat_profile(ObjectId::new("troll"), CombatProfile { win_percent: 55, death_percent: 25 })
    }

    #[test]
    fn finds_and_verifies_a_winning_plan() {
        let eng = engine_with_troll(99);
        let plan = find_winning_combat_plan(&eng, ObjectId::new("troll"), ObjectId::new("sword"), 3, 100, 20);
        let plan = plan.expect("expected a winning burn+combat plan within the search bounds");
        assert!(verify_plan(&eng, &plan, ObjectId::new("troll"), ObjectId::new("sword"), 20));
    }

    #[test]
    fn sequences_of_length_enumerates_all_combinations() {
        assert_eq!(sequences_of_length(0).len(), 1);
        assert_eq!(sequences_of_length(1).len(), 3);
        assert_eq!(sequences_of_length(2).len(), 9);
    }
}
