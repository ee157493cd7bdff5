//! Errors reported by the minimizers of this crate.
use std::convert::Infallible;
use thiserror::Error;

/// Failure of a minimization run.
///
/// `E` is the error type of the objective function. Objectives that cannot
/// fail use the default, [`Infallible`].
#[derive(Debug, Error)]
pub enum OptimizeError<E: std::error::Error + 'static = Infallible> {
    /// A hyperparameter or the initial point was rejected before any evaluation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The initial simplex does not have `dim + 1` rows of `dim` coordinates.
    #[error("initial simplex has shape {found:?}, expected {expected:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The objective function failed. The run stops at the first failure.
    #[error("objective function evaluation failed")]
    Objective(#[source] E),
}

/// Result type of the minimizers, generic over the objective's error type.
pub type Result<T, E = Infallible> = std::result::Result<T, OptimizeError<E>>;
