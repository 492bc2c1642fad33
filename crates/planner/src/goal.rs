// The goal vocabulary of spec.md §4.6: everything the Reactive Planner's
// LIFO stack can hold. Each variant corresponds to one of the
// action-selection rules authoritative per goal type.

use engine_contract::{FlagName, ObjectId, RoomId};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Goal {
    AtRoom(RoomId),
    HaveItem(ObjectId),
    /// The object is visible from here (carried, or sitting in the current
    /// room/an open container here) without necessarily being carried —
    /// weaker than `HaveItem`, used when a prep only needs to see something
    /// (e.g. read an inscription) rather than pick it up.
    ItemVisible(ObjectId),
    /// A named flag is set, satisfied by running whichever catalog prep
    /// produces it (spec.md §3's Goal variant list; the schedule's `Prep`
    /// entries reduce to this).
    FlagSet(FlagName),
    ItemDeposited(ObjectId),
    KillEnemy(ObjectId),
    ContainerOpen(ObjectId),
    LanternOn,
    AllTreasuresDeposited,
    Win,
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Goal::AtRoom(r) => write!(f, "AtRoom({r})"),
            Goal::HaveItem(o) => write!(f, "HaveItem({o})"),
            Goal::ItemVisible(o) => write!(f, "ItemVisible({o})"),
            Goal::FlagSet(flag) => write!(f, "FlagSet({flag})"),
            Goal::ItemDeposited(o) => write!(f, "ItemDeposited({o})"),
            Goal::KillEnemy(e) => write!(f, "KillEnemy({e})"),
            Goal::ContainerOpen(c) => write!(f, "ContainerOpen({c})"),
            Goal::LanternOn => write!(f, "LanternOn"),
            Goal::AllTreasuresDeposited => write!(f, "AllTreasuresDeposited"),
            Goal::Win => write!(f, "Win"),
        }
    }
}
