use thiserror::Error;

/// The Verifier's checks and recovery-strategy selection are total functions
/// over a snapshot; this type exists for the one genuine failure mode a
/// caller can hit: asking for a strategy against an empty room set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifierError {
    #[error("no rooms supplied to recovery strategy generation")]
    EmptyRoomSet,
}
