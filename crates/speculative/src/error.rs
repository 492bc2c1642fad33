use thiserror::Error;

/// Speculative execution itself cannot fail in the sense of returning an
/// error value — every search either finds a plan or returns `None`
/// (spec.md §4.7). This type exists for the one genuine failure mode: a
/// caller asking for a search bound that can't possibly terminate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpeculativeError {
    #[error("max_offset and max_burn must both be greater than zero search budget, got offset={max_offset} burn={max_burn}")]
    EmptySearchBudget { max_offset: u64, max_burn: usize },
}
