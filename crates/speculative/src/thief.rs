// Thief-daemon prediction (spec.md §4.7/§4.8): simulates the thief turn by
// turn on a clone of the engine, reporting whether and when a theft is
// expected, and recommending a response. Engines never announce theft
// explicitly (spec.md §4.8), so detection is pre/post inventory diffing,
// the same technique the real Verifier uses on live turns.

use crate::burn::{find_winning_combat_plan, BurnPlan};
use engine_contract::{Action, Engine, ObjectId};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recommendation {
    Proceed,
    Wait,
    Avoid(Vec<Action>),
    Engage,
}

#[derive(Clone, Debug)]
pub struct ThiefForecast {
    /// Turn indices (0-based, relative to the simulation start) on which a
    /// theft was detected.
    pub theft_turns: Vec<u32>,
    pub items_at_risk: Vec<ObjectId>,
    pub recommendation: Recommendation,
}

impl ThiefForecast {
    pub fn will_steal(&self) -> bool {
        !self.theft_turns.is_empty()
    }
}

/// Runs `turns` simulated turns of `probe` (default: `Wait`) on a clone of
/// `engine`, diffing carried inventory after each turn to detect theft.
/// Never mutates the real engine.
pub fn predict_thief<E>(engine: &E, turns: u32, probe: &Action) -> ThiefForecast
where
    E: Engine + Clone,
{
    let mut trial = engine.clone();
    let mut theft_turns = Vec::new();
    let mut items_at_risk: HashSet<ObjectId> = HashSet::new();
    let mut carried = trial.snapshot().inventory_all();

    for turn in 0..turns {
        let (snapshot, _message) = trial.execute(probe);
        let now_carried = snapshot.inventory_all();
        let lost: Vec<ObjectId> = carried.difference(&now_carried).copied().collect();
        if !lost.is_empty() {
            theft_turns.push(turn);
            items_at_risk.extend(lost);
        }
        carried = now_carried;
        if !snapshot.alive() {
            break;
        }
    }

    let recommendation = if theft_turns.is_empty() {
        Recommendation::Proceed
    } else if theft_turns[0] == 0 {
        Recommendation::Wait
    } else {
        Recommendation::Avoid(vec![probe.clone(); theft_turns[0] as usize])
    };

    ThiefForecast { theft_turns, items_at_risk: items_at_risk.into_iter().collect(), recommendation }
}

/// Combines a thief forecast with a combat-plan search: if the thief is
/// predicted to threaten the player's items before a given treasure run,
/// recommends engaging it first via a winning combat plan rather than
/// merely avoiding it.
pub fn recommend_with_combat_option<E>(
    engine: &E,
    thief: ObjectId,
    weapon: ObjectId,
    turns: u32,
    max_burn: usize,
    max_offset: u64,
    max_combat_turns: u32,
) -> (ThiefForecast, Option<BurnPlan>)
where
    E: Engine + Clone,
{
    let forecast = predict_thief(engine, turns, &Action::Wait);
    if !forecast.will_steal() {
        return (forecast, None);
    }
    let plan = find_winning_combat_plan(engine, thief, weapon, max_burn, max_offset, max_combat_turns);
    let mut forecast = forecast;
    if plan.is_some() {
        forecast.recommendation = Recommendation::Engage;
    }
    (forecast, plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::{TestEngine, ThiefProfile, WorldBuilder};
    use engine_contract::RoomId;

    fn engine_with_thief(seed: u64, appear_percent: u8) -> TestEngine {
        let (layout, state) = WorldBuilder::new()
            .room(RoomId::new("room"), Default::default())
            .start_at(RoomId::new("room"))
            .object_carried(ObjectId::new("lamp"))
            .build();
        TestEngine::new(layout, state, seed)
            .with_thief(ThiefProfile { appear_percent, thief_bag: ObjectId::new("thief_bag") })
    }

    #[test]
    fn predicts_no_theft_when_thief_never_appears() {
        let eng = engine_with_thief(5, 0);
        let forecast = predict_thief(&eng, 10, &Action::Wait);
        assert!(!forecast.will_steal());
        assert_eq!(forecast.recommendation, Recommendation::Proceed);
    }

    #[test]
    fn predicts_theft_and_recommends_avoidance_when_guaranteed() {
        let eng = engine_with_thief(5, 100);
        let forecast = predict_thief(&eng, 3, &Action::Wait);
        assert!(forecast.will_steal());
        assert!(forecast.items_at_risk.contains(&ObjectId::new("lamp")));
    }

    #[test]
    fn prediction_never_mutates_the_real_engine() {
        let eng = engine_with_thief(5, 100);
        let before = eng.snapshot().inventory_all();
        let _ = predict_thief(&eng, 5, &Action::Wait);
        assert_eq!(eng.snapshot().inventory_all(), before);
    }
}
