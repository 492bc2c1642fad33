use crate::types::PrepId;
use thiserror::Error;

/// Fatal at construction time (spec.md §7's `ConfigError`): a cyclic prep
/// dependency graph is a configuration error, never recoverable at runtime.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrepError {
    #[error("prep dependency graph contains a cycle involving {0}")]
    Cycle(PrepId),

    #[error("prep catalog references unknown prep id: {0}")]
    UnknownPrep(PrepId),
}
