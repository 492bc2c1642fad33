use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("prep dependency error: {0}")]
    Prep(#[from] prepcatalog::PrepError),
}
