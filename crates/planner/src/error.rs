use navgraph::NavError;
use prepcatalog::PrepError;
use routeopt::RouteError;
use thiserror::Error;
use verifier::VerifierError;

/// Aggregates the lower crates' errors via `#[from]`, matching the
/// teacher's pattern of a planning-facade error wrapping leaf failures
/// (SPEC_FULL.md §11.1).
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Prep(#[from] PrepError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Verifier(#[from] VerifierError),
}
