// The Action API grammar of spec.md §6. `execute(S, Action) -> (S', Message)`
// is deterministic given `(S, PRNG)` and does not throw; this enum is the
// closed set of verbs the planner may ever emit.

use crate::ids::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Go { direction: crate::ids::Direction },
    Take { object: ObjectId },
    Drop { object: ObjectId },
    PutIn { object: ObjectId, container: ObjectId },
    Open { object: ObjectId },
    Close { object: ObjectId },
    Unlock { object: ObjectId, key: ObjectId },
    TurnOn { object: ObjectId },
    TurnOff { object: ObjectId },
    Attack { enemy: ObjectId, weapon: ObjectId },
    Say { word: String },
    Move { object: ObjectId },
    Tie { object: ObjectId, to: ObjectId },
    Push { object: ObjectId },
    Turn { object: ObjectId, with: ObjectId },
    Pray,
    Wait,
    Look,
    Inventory,
    Diagnose,
    Ring { object: ObjectId },
    Light { object: ObjectId, with: ObjectId },
    Read { object: ObjectId },
    Wave { object: ObjectId },
    Inflate { object: ObjectId, with: ObjectId },
}

impl Action {
    /// Whether this action is a "safe" (zero-engine-RNG) action in the
    /// sense of spec.md §4.7's burn sequences: it never itself consumes a
    /// combat/probability roll, though daemons may still consume RNG on the
    /// turn it takes.
    pub fn is_safe_burn_candidate(&self) -> bool {
        matches!(self, Action::Wait | Action::Look | Action::Inventory)
    }
}
