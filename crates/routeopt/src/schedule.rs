// The `Schedule` data model of spec.md §3: an ordered sequence of high-level
// plan entries the Reactive Planner reduces one-at-a-time into sub-goals.
// `serde` derives make the "optional persistence" schedule file format of
// spec.md §6 a direct `serde_json` round trip rather than a bespoke parser.

use engine_contract::{FlagName, ObjectId, RoomId};
use prepcatalog::{AtomicStep, PrepId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ScheduleEntry {
    Move { to: RoomId },
    Prep { id: PrepId },
    Collect { treasure: ObjectId },
    DepositAll,
    /// `id` is the atomic prep this sequence performs; `steps` are its own
    /// concrete actions, carried here (rather than re-derived from the
    /// catalog at execution time) so the schedule file format is
    /// self-contained per spec.md §6.
    AtomicSequence { id: PrepId, name: String, location: RoomId, steps: Vec<AtomicStep>, window: u32 },
    /// Treasures to collect while a timed effect (`during.0` set for
    /// `during.1` turns) resolves (spec.md §3/§4.5).
    ParallelWork { during: (FlagName, u32), treasures: Vec<ObjectId> },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter()
    }

    /// Every `Collect(t)` entry's position must be preceded by all preps in
    /// `preps_for_treasure(t)` (spec.md §4.5's schedule invariant); returns
    /// the first violation found, if any.
    pub fn first_missing_prep_violation(
        &self,
        catalog: &prepcatalog::PrepCatalog,
    ) -> Option<(ObjectId, PrepId)> {
        let mut done: std::collections::HashSet<PrepId> = std::collections::HashSet::new();
        for entry in &self.entries {
            match entry {
                ScheduleEntry::Prep { id } => {
                    done.insert(id.clone());
                }
                ScheduleEntry::AtomicSequence { id, .. } => {
                    done.insert(id.clone());
                }
                ScheduleEntry::Collect { treasure } => {
                    for required in catalog.preps_for_treasure(*treasure) {
                        if !done.contains(&required) {
                            return Some((*treasure, required));
                        }
                    }
                }
                ScheduleEntry::Move { .. } | ScheduleEntry::DepositAll | ScheduleEntry::ParallelWork { .. } => {}
            }
        }
        None
    }

    /// `DepositAll` must appear iff at least one `Collect` precedes it
    /// (spec.md §4.5's schedule invariant).
    pub fn deposit_all_preceded_by_collect(&self) -> bool {
        let mut seen_collect = false;
        for entry in &self.entries {
            match entry {
                ScheduleEntry::Collect { .. } => seen_collect = true,
                ScheduleEntry::DepositAll if !seen_collect => return false,
                _ => {}
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json_with_structural_equality() {
        let mut schedule = Schedule::default();
        schedule.push(ScheduleEntry::Move { to: RoomId::new("kitchen") });
        schedule.push(ScheduleEntry::Collect { treasure: ObjectId::new("egg") });
        schedule.push(ScheduleEntry::DepositAll);

        let json = serde_json::to_string(&schedule).unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(schedule, back);
    }

    #[test]
    fn deposit_all_requires_a_preceding_collect() {
        let mut schedule = Schedule::default();
        schedule.push(ScheduleEntry::Move { to: RoomId::new("kitchen") });
        schedule.push(ScheduleEntry::DepositAll);
        assert!(!schedule.deposit_all_preceded_by_collect());

        schedule.entries.insert(1, ScheduleEntry::Collect { treasure: ObjectId::new("egg") });
        assert!(schedule.deposit_all_preceded_by_collect());
    }
}
