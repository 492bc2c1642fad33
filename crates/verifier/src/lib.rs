//! C8 Verifier & Recovery (spec.md §4.8): pre-condition invariants,
//! post-condition diffing, side-effect detection, the thief monitor, and
//! recovery-strategy generation.

pub mod error;
pub mod invariants;
pub mod postcondition;
pub mod recovery;
pub mod side_effects;
pub mod thief_monitor;

pub use error::VerifierError;
pub use invariants::{check_preconditions, ExpectedPreconditions, PreconditionCheck, Severity};
pub use postcondition::{open_close_round_trips, verify_action, VerifyResult};
pub use recovery::{candidate_strategies, choose_strategy, RecoveryContext, RecoveryStrategy};
pub use side_effects::{detect_side_effects, looks_like_theft, thief_present, SideEffects};
pub use thief_monitor::{ThiefEvent, ThiefMonitor};
