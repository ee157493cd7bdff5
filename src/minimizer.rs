//! This module provides the base framework for the minimizers present in this crate, such as the
//! base trait and return type.
use crate::error::Result;
use ndarray::prelude::*;
use std::convert::Infallible;
use std::time::Duration;

/// Minimizer states at the end of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The spread of scores across the simplex fell below the tolerance.
    Converged,
    /// The best score stopped improving for too many consecutive iterations.
    Stagnated,
    /// The iteration cap was reached.
    MaxIterations,
    /// The cap on objective evaluations was reached.
    MaxFunctionEvaluations,
    /// The wall-clock budget ran out.
    Timeout,
    /// All vertices of the simplex coincide, no further progress is possible.
    DegenerateSimplex,
}

impl RunStatus {
    /// Whether the run stopped because it settled on a minimum rather than hitting a budget.
    pub fn is_converged(&self) -> bool {
        matches!(self, RunStatus::Converged | RunStatus::Stagnated)
    }
}

/// A minimization result, storing various details of the run and the final results.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimResult {
    /// The runtime of the minimization according to the system clock.
    pub runtime: Duration,
    /// The number of function evaluations performed.
    pub f_evals: usize,
    /// The number of iterations run.
    pub iterations: usize,
    /// The final parameter values.
    pub minimum: Array1<f64>,
    /// The function value at the found minimum.
    pub minimum_value: f64,
    /// Why the run stopped.
    pub status: RunStatus,
    /// Best function value of the initial simplex followed by the best value after each
    /// iteration.
    pub history: Vec<f64>,
}

/// A general minimizer trait.
pub trait Minimizer {
    /// Minimizes the value returned by a fallible `func` by exploring the parameter space from
    /// `x0`. The first error returned by `func` aborts the run and is handed back unchanged.
    fn try_minimize<F, E>(&self, func: F, x0: ArrayView1<f64>) -> Result<OptimResult, E>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<f64, E>,
        E: std::error::Error + 'static;

    /// Minimizes the given function returned scalar value by exploring the parameter space.
    fn minimize<F>(&self, func: F, x0: ArrayView1<f64>) -> Result<OptimResult>
    where
        F: Fn(ArrayView1<f64>) -> f64,
    {
        self.try_minimize(|x| Ok::<f64, Infallible>(func(x)), x0)
    }
}
