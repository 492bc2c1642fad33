// Pre-condition invariants (spec.md §4.8): checked before an action is sent
// to the engine. Critical failures abort the step; warnings are logged and
// the step proceeds.

use engine_contract::{EntityRef, FlagName, ObjectId, RoomId, Snapshot, StaticTables};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
}

#[derive(Clone, Debug)]
pub struct PreconditionCheck {
    pub name: &'static str,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
}

impl PreconditionCheck {
    pub fn is_blocking_failure(&self) -> bool {
        !self.passed && self.severity == Severity::Critical
    }
}

/// What the upcoming action expects to be true, assembled by the Reactive
/// Planner per goal category before handing an action to the engine
/// (spec.md §4.8: "per goal category: player alive, has light ..., at
/// expected room, has weapon, combat readiness").
#[derive(Clone, Debug, Default)]
pub struct ExpectedPreconditions {
    pub expected_room: Option<RoomId>,
    pub requires_light: bool,
    pub requires_weapon: Option<ObjectId>,
    pub combat_ready: Option<ObjectId>,
}

/// Runs every applicable check against `snapshot`. Player-alive is always
/// checked; the rest are checked only when `expected` names them.
pub fn check_preconditions(snapshot: &impl Snapshot, expected: &ExpectedPreconditions, tables: &StaticTables) -> Vec<PreconditionCheck> {
    let mut checks = Vec::new();

    checks.push(PreconditionCheck {
        name: "player_alive",
        passed: snapshot.alive(),
        severity: Severity::Critical,
        message: if snapshot.alive() { "player is alive".into() } else { "player is dead".into() },
    });

    if let Some(room) = expected.expected_room {
        let at_room = snapshot.here() == room;
        checks.push(PreconditionCheck {
            name: "at_expected_room",
            passed: at_room,
            severity: Severity::Critical,
            message: format!("expected to be at {room}, currently at {}", snapshot.here()),
        });
    }

    // Light is only a hard requirement when the current room actually
    // requires it; elsewhere an unlit lantern is merely a warning (spec.md
    // §4.8: "has light (warning-level if not in a dark room)").
    if expected.requires_light {
        let dark_here = tables.requires_light(snapshot.here());
        let severity = if dark_here { Severity::Critical } else { Severity::Warning };
        checks.push(PreconditionCheck {
            name: "has_light",
            passed: snapshot.lit(),
            severity,
            message: if snapshot.lit() { "lit".into() } else { "not lit".into() },
        });
    }

    if let Some(weapon) = expected.requires_weapon {
        let carried = snapshot.inventory_all().contains(&weapon);
        checks.push(PreconditionCheck {
            name: "has_weapon",
            passed: carried,
            severity: Severity::Critical,
            message: format!("weapon {weapon} carried: {carried}"),
        });
    }

    if let Some(enemy) = expected.combat_ready {
        let enemy_already_dead = snapshot.flag(EntityRef::Object(enemy), FlagName::new(format!("{}_dead", enemy.as_str())));
        checks.push(PreconditionCheck {
            name: "combat_readiness",
            passed: snapshot.alive() && !enemy_already_dead,
            severity: Severity::Warning,
            message: if enemy_already_dead { format!("{enemy} is already dead") } else { "ready".into() },
        });
    }

    checks
}
