//! C7 Speculative Executor (spec.md §4.7): save/restore/advance over the
//! engine's reversible PRNG, plus combat simulation, winning-offset search,
//! burn-sequence search, and thief prediction built on top of it.

pub mod burn;
pub mod combat;
pub mod error;
pub mod guard;
pub mod thief;

pub use burn::{find_winning_combat_plan, verify_plan, BurnPlan};
pub use combat::{find_winning_offset, simulate_combat, with_speculative, CombatOutcome, CombatResult, WinningOffset};
pub use error::SpeculativeError;
pub use guard::SpeculativeGuard;
pub use thief::{predict_thief, recommend_with_combat_option, Recommendation, ThiefForecast};
