use thiserror::Error;

use parkopt_model::ModelError;
use parkopt_nsga3::Nsga3Error;

/// Failure modes of the optimizer facade. Input problems are caught before
/// the search starts; search errors indicate a bug in the wiring (e.g. an
/// objective count mismatch) and carry no partial results.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ModelError),
    #[error("search failed: {0}")]
    Search(#[from] Nsga3Error),
}
