//! C5 Route Optimizer (spec.md §4.5).

pub mod error;
pub mod optimizer;
pub mod schedule;
pub mod tsp;

pub use error::RouteError;
pub use optimizer::RouteOptimizer;
pub use schedule::{Schedule, ScheduleEntry};
