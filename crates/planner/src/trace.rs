// Per-category toggleable tracing (spec.md §4.6): "tracing is toggleable
// per-category (parser|verbs|actions|daemons|thief). When disabled, trace
// entries are not allocated." A separate, structured mechanism from the
// `log` facade, consumed by the planner's caller as data rather than
// printed (SPEC_FULL.md §11.2).

use crate::goal::Goal;
use engine_contract::{Action, ObjectId, RoomId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TraceCategory {
    Parser,
    Verbs,
    Actions,
    Daemons,
    Thief,
}

/// Which categories are currently being recorded. Copy, so checking it costs
/// nothing; `is_enabled` gates every allocation in `TraceLog::record`.
#[derive(Clone, Copy, Debug)]
pub struct TraceMask {
    parser: bool,
    verbs: bool,
    actions: bool,
    daemons: bool,
    thief: bool,
}

impl TraceMask {
    pub const NONE: TraceMask = TraceMask { parser: false, verbs: false, actions: false, daemons: false, thief: false };
    pub const ALL: TraceMask = TraceMask { parser: true, verbs: true, actions: true, daemons: true, thief: true };

    pub fn with(mut self, category: TraceCategory, enabled: bool) -> Self {
        match category {
            TraceCategory::Parser => self.parser = enabled,
            TraceCategory::Verbs => self.verbs = enabled,
            TraceCategory::Actions => self.actions = enabled,
            TraceCategory::Daemons => self.daemons = enabled,
            TraceCategory::Thief => self.thief = enabled,
        }
        self
    }

    pub fn is_enabled(&self, category: TraceCategory) -> bool {
        match category {
            TraceCategory::Parser => self.parser,
            TraceCategory::Verbs => self.verbs,
            TraceCategory::Actions => self.actions,
            TraceCategory::Daemons => self.daemons,
            TraceCategory::Thief => self.thief,
        }
    }
}

impl Default for TraceMask {
    fn default() -> Self {
        TraceMask::NONE
    }
}

#[derive(Clone, Debug)]
pub enum TraceEvent {
    Action(Action),
    Satisfied,
    Decompose(Vec<Goal>),
    CycleSkip,
    Stuck(String),
}

#[derive(Clone, Debug)]
pub struct TraceEntry {
    pub turn: u32,
    pub room: RoomId,
    pub goal: Goal,
    pub event: TraceEvent,
    pub message: String,
    pub inventory: Vec<ObjectId>,
    pub score: i64,
}

#[derive(Clone, Debug, Default)]
pub struct TraceLog {
    mask: TraceMask,
    entries: Vec<TraceEntry>,
}

impl TraceLog {
    pub fn new(mask: TraceMask) -> Self {
        Self { mask, entries: Vec::new() }
    }

    /// Records `entry` only if `category` is enabled; `make_entry` is a
    /// closure so callers never build a `TraceEntry` (and its `Vec`/`String`
    /// allocations) when tracing that category is off.
    pub fn record(&mut self, category: TraceCategory, make_entry: impl FnOnce() -> TraceEntry) {
        if self.mask.is_enabled(category) {
            self.entries.push(make_entry());
        }
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }
}
