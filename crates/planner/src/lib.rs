//! C6 Reactive Planner (spec.md §4.6): a goal-stack planner/executor loop
//! driven one action at a time against the Engine Contract, built on top of
//! the Observer (C1), Graph Builder/Pathfinder (C2/C3), Prep Catalog (C4)
//! and Route Optimizer (C5).

pub mod actions;
pub mod config;
pub mod error;
pub mod goal;
pub mod state;
pub mod trace;

pub use actions::{select_action_for, Decision, StuckReason};
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use goal::Goal;
pub use state::{PlannerState, Status};
pub use trace::{TraceCategory, TraceEntry, TraceEvent, TraceLog, TraceMask};
