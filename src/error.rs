use ordered_float::FloatIsNan;
use thiserror::Error;

use crate::config::BoundaryHint;

pub type Result<T> = ::std::result::Result<T, VoronoiError>;

/// Why a diagram could not be computed.
///
/// Everything but `Invariant` is an input problem caught before the sweep
/// starts. `Invariant` means the sweep itself went wrong and is a bug.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum VoronoiError {
    #[error("at least two sites are needed, got {count}")]
    TooFewSites { count: usize },

    #[error("site ({x}, {y}) is given more than once")]
    DuplicateSite { x: f64, y: f64 },

    #[error("site ({x}, {y}) is not finite")]
    NonFiniteSite { x: f64, y: f64 },

    #[error("invalid boundary hint {0:?}")]
    InvalidBoundary(BoundaryHint),

    #[error("coordinate is NaN")]
    NaN(#[from] FloatIsNan),

    #[error("internal invariant violated: {0}")]
    Invariant(&'static str)
}

impl VoronoiError {
    /// Whether the caller passed bad input, as opposed to a failure inside the sweep.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(*self, VoronoiError::Invariant(..))
    }
}
