//! Nelder-Mead downhill simplex minimization.
//!
//! The simplex starts as the initial point plus one vertex per dimension,
//! offset by `step` along that axis. Every iteration replaces the worst vertex
//! by its reflection through the centroid of the others, an expansion of that
//! reflection, or a contraction toward the worst vertex. When none of these
//! improves on the worst vertex, the simplex shrinks toward the best one.
//!
//! Reference: Nelder, J. A. and Mead, R. A simplex method for function
//! minimization. 1965. The Computer Journal. 7:4, pp 308--313
//!
//! The `adaptive` option follows
//!
//! Gao, F and Han, L. Implementing the Nelder-Mead simplex algorithm with
//! adaptive parameters. 2012. Computational Optimization and Applications.
//! 51:1, pp 259--277
//!
//! # Use case
//!
//! The Nelder-Mead algorithm does not require a gradient or a hessian.
//! As a tradeoff it typically requires a lot of function evaluations to
//! find a minimum. Further, there are few theoretical results on the
//! convergence of Nelder-Mead iterations.
//!
//! # Examples
//!
//! ```
//! # use ndarray::prelude::*;
//! # use simplex_optimize::Minimizer;
//! # use simplex_optimize::vector::NelderMeadBuilder;
//! let function =
//!     |x: ArrayView1<f64>| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2);
//! let minimizer = NelderMeadBuilder::default()
//!     .ftol(1e-10)
//!     .max_stagnant(50usize)
//!     .maxiter(5000usize)
//!     .build()
//!     .unwrap();
//! let args = Array::from_vec(vec![-1.2, 1.0]);
//! let res = minimizer.minimize(&function, args.view()).unwrap();
//! assert!((res.minimum[0] - 1.0).abs() < 1e-3);
//! assert!((res.minimum[1] - 1.0).abs() < 1e-3);
//! ```

use crate::error::{OptimizeError, Result};
use crate::minimizer::{Minimizer, OptimResult, RunStatus};
use crate::utils::WrappedFunction;
use derive_builder::Builder;
use log::{debug, info, trace, warn};
use ndarray::prelude::*;
use ndarray::s;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::time::{Duration, Instant};

type Simplex = Vec<(f64, Array1<f64>)>;

/// How the contraction coefficient `rho` is applied to the worst vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contraction {
    /// `centroid + rho * (worst - centroid)`. A positive `rho` contracts inside the simplex,
    /// a negative one lands between the centroid and the reflected point.
    #[default]
    TowardWorst,
    /// `centroid + rho * (centroid - worst)`. A negative `rho` contracts inside the simplex.
    AwayFromWorst,
}

impl Contraction {
    /// Coefficient of the given magnitude that contracts inside the simplex.
    fn inside(self, magnitude: f64) -> f64 {
        match self {
            Contraction::TowardWorst => magnitude,
            Contraction::AwayFromWorst => -magnitude,
        }
    }
}

/// The geometric step an iteration settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Reflect,
    Expand,
    Contract,
    Shrink,
}

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
/// A minimizer for a scalar function of one or more variables using the Nelder-Mead algorithm.
pub struct NelderMead {
    /// Offset added to each coordinate of the initial point, one axis at a time, to build the
    /// initial simplex.
    #[builder(default = "0.1")]
    pub step: f64,

    /// Score spread across the simplex below which the run has converged. The best score must
    /// also improve by more than this for an iteration to count as progress.
    #[builder(default = "1e-5")]
    pub ftol: f64,

    /// Largest coordinate distance between the best vertex and any other at which the simplex
    /// counts as collapsed.
    #[builder(default = "1e-12")]
    pub xtol: f64,

    /// Number of consecutive iterations without progress after which the run stops.
    #[builder(default = "10")]
    pub max_stagnant: usize,

    /// The maximum number of iterations to optimize. Defaults to n*200 where n is the number of
    /// parameters to optimize.
    #[builder(default = "None")]
    #[builder(setter(into))]
    pub maxiter: Option<usize>,

    /// The maximum number of function calls used to optimize. Unbounded unless given. Checked
    /// between iterations, so a run may exceed it by the evaluations of a single iteration.
    #[builder(default = "None")]
    #[builder(setter(into))]
    pub maxfun: Option<usize>,

    /// Wall-clock budget for the run, checked between iterations.
    #[builder(default = "None")]
    #[builder(setter(into))]
    pub max_time: Option<Duration>,

    /// Reflection coefficient.
    #[builder(default = "1.0")]
    pub alpha: f64,

    /// Expansion coefficient.
    #[builder(default = "2.0")]
    pub gamma: f64,

    /// Contraction coefficient, applied according to `contraction`.
    #[builder(default = "-0.5")]
    pub rho: f64,

    /// Shrink coefficient.
    #[builder(default = "0.5")]
    pub sigma: f64,

    #[builder(default)]
    pub contraction: Contraction,

    /// Adapt algorithm parameters to dimensionality of the problem. Useful for high-dimensional
    /// minimization. Overrides `alpha`, `gamma`, `rho` and `sigma` for two or more dimensions.
    #[builder(default = "false")]
    pub adaptive: bool,
}

fn positive(name: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be positive and finite, got {}", name, value))
    }
}

fn finite(name: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{} must be finite, got {}", name, value))
    }
}

fn nonzero(name: &str, value: usize) -> std::result::Result<(), String> {
    if value == 0 {
        Err(format!("{} must be at least 1", name))
    } else {
        Ok(())
    }
}

impl NelderMeadBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(step) = self.step {
            positive("step", step)?;
        }
        if let Some(ftol) = self.ftol {
            positive("ftol", ftol)?;
        }
        if let Some(xtol) = self.xtol {
            finite("xtol", xtol)?;
            if xtol < 0.0 {
                return Err(format!("xtol must not be negative, got {}", xtol));
            }
        }
        if let Some(max_stagnant) = self.max_stagnant {
            nonzero("max_stagnant", max_stagnant)?;
        }
        if let Some(Some(maxiter)) = self.maxiter {
            nonzero("maxiter", maxiter)?;
        }
        if let Some(Some(maxfun)) = self.maxfun {
            nonzero("maxfun", maxfun)?;
        }
        for (name, coeff) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("rho", self.rho),
            ("sigma", self.sigma),
        ] {
            if let Some(coeff) = coeff {
                finite(name, coeff)?;
            }
        }
        Ok(())
    }
}

impl Minimizer for NelderMead {
    /// Search for the value minimizing `func` given an initial guess
    /// in the form of a point. The algorithm will explore the variable
    /// space without constraints.
    fn try_minimize<F, E>(&self, func: F, x0: ArrayView1<f64>) -> Result<OptimResult, E>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<f64, E>,
        E: std::error::Error + 'static,
    {
        let n = x0.len();
        if n == 0 {
            return Err(OptimizeError::InvalidParameter(
                "initial point must have at least one coordinate".to_string(),
            ));
        }
        let mut init_simplex = Array2::<f64>::zeros((n + 1, n));
        init_simplex.row_mut(0).assign(&x0);
        init_simplex
            .slice_mut(s![1.., ..])
            .assign(&(Array2::<f64>::eye(n) * self.step + &x0));

        self.try_minimize_simplex(func, init_simplex)
    }
}

impl NelderMead {
    /// Search for the value minimizing `func` given an initial guess
    /// in the form of a set of coordinates, the `init_simplex`. This algorithm
    /// only ever explores the space spanned by these initial vectors.
    /// If you have parameter restrictions that effectively place your parameters
    /// in a subspace, you can enforce these restrictions by setting `init_simplex`
    /// to a basis of this subspace.
    pub fn minimize_simplex<F>(&self, func: F, init_simplex: Array2<f64>) -> Result<OptimResult>
    where
        F: Fn(ArrayView1<f64>) -> f64,
    {
        self.try_minimize_simplex(|x| Ok::<f64, Infallible>(func(x)), init_simplex)
    }

    /// Fallible counterpart of [`NelderMead::minimize_simplex`]. The first error returned by
    /// `func` ends the run.
    pub fn try_minimize_simplex<F, E>(
        &self,
        func: F,
        init_simplex: Array2<f64>,
    ) -> Result<OptimResult, E>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<f64, E>,
        E: std::error::Error + 'static,
    {
        self.check_parameters().map_err(OptimizeError::InvalidParameter)?;

        let (rows, dim) = init_simplex.dim();
        if dim == 0 {
            return Err(OptimizeError::InvalidParameter(
                "initial point must have at least one coordinate".to_string(),
            ));
        }
        if rows != dim + 1 {
            return Err(OptimizeError::DimensionMismatch {
                expected: (dim + 1, dim),
                found: (rows, dim),
            });
        }
        if init_simplex.iter().any(|v| !v.is_finite()) {
            return Err(OptimizeError::InvalidParameter(
                "initial simplex must only contain finite coordinates".to_string(),
            ));
        }

        let (maxiter, alpha, gamma, rho, sigma) = self.initialize_parameters(dim);
        debug!(
            "Nelder-Mead in {} dimensions: maxiter={}, alpha={}, gamma={}, rho={} ({:?}), sigma={}",
            dim, maxiter, alpha, gamma, rho, self.contraction, sigma
        );

        let start = Instant::now();
        let mut func = WrappedFunction::new(func);
        let mut simplex = Simplex::with_capacity(rows);
        for xi in init_simplex.outer_iter() {
            simplex.push((func.call(xi)?, xi.to_owned()));
        }
        self.order_simplex(&mut simplex);

        let mut iterations = 0;
        let mut no_improv = 0;
        let mut prev_best = simplex[0].0;
        let mut history = vec![prev_best];

        let status = loop {
            if let Some(status) =
                self.finished(&simplex, iterations, maxiter, func.num, start.elapsed(), no_improv)
            {
                break status;
            }

            let step = self.iterate(&mut simplex, &mut func, alpha, gamma, rho, sigma)?;
            iterations += 1;

            let best = simplex[0].0;
            if best < prev_best - self.ftol {
                no_improv = 0;
                prev_best = best;
            } else {
                no_improv += 1;
            }
            history.push(best);
            trace!("iteration {}: {:?}, best so far: {}", iterations, step, best);
        };

        let (minimum_value, minimum) = simplex.swap_remove(0);
        match status {
            RunStatus::DegenerateSimplex => warn!(
                "simplex collapsed after {} iterations at {} (f = {})",
                iterations, minimum, minimum_value
            ),
            _ => info!(
                "Nelder-Mead stopped ({:?}) after {} iterations and {} evaluations: f = {}",
                status, iterations, func.num, minimum_value
            ),
        }

        Ok(OptimResult {
            runtime: start.elapsed(),
            f_evals: func.num,
            iterations,
            minimum,
            minimum_value,
            status,
            history,
        })
    }

    /// Performs a single reflect/expand/contract/shrink step on an ordered simplex and leaves
    /// it ordered again.
    fn iterate<F, E>(
        &self,
        simplex: &mut Simplex,
        func: &mut WrappedFunction<F>,
        alpha: f64,
        gamma: f64,
        rho: f64,
        sigma: f64,
    ) -> Result<Step, E>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<f64, E>,
        E: std::error::Error + 'static,
    {
        let n = simplex.len() - 1;
        let centroid = self.centroid(simplex);

        let reflected = &centroid + &(alpha * &(&centroid - &simplex[n].1));
        let f_reflected = func.call(reflected.view())?;

        let step = if f_reflected < simplex[0].0 {
            // try expanding beyond the reflected point
            let expanded = &centroid + &(gamma * &(&reflected - &centroid));
            let f_expanded = func.call(expanded.view())?;
            if f_expanded < f_reflected {
                simplex[n] = (f_expanded, expanded);
                Step::Expand
            } else {
                simplex[n] = (f_reflected, reflected);
                Step::Reflect
            }
        } else if f_reflected < simplex[n - 1].0 {
            simplex[n] = (f_reflected, reflected);
            Step::Reflect
        } else {
            let contracted = self.contract(&centroid, &simplex[n].1, rho);
            let f_contracted = func.call(contracted.view())?;
            if f_contracted < simplex[n].0 {
                simplex[n] = (f_contracted, contracted);
                Step::Contract
            } else {
                self.shrink(simplex, func, sigma)?;
                Step::Shrink
            }
        };

        self.order_simplex(simplex);
        Ok(step)
    }

    /// Rejects parameter values the algorithm cannot work with. The fields are public, so the
    /// builder's validation alone is not enough.
    fn check_parameters(&self) -> std::result::Result<(), String> {
        positive("step", self.step)?;
        positive("ftol", self.ftol)?;
        finite("xtol", self.xtol)?;
        if self.xtol < 0.0 {
            return Err(format!("xtol must not be negative, got {}", self.xtol));
        }
        nonzero("max_stagnant", self.max_stagnant)?;
        if let Some(maxiter) = self.maxiter {
            nonzero("maxiter", maxiter)?;
        }
        if let Some(maxfun) = self.maxfun {
            nonzero("maxfun", maxfun)?;
        }
        finite("alpha", self.alpha)?;
        finite("gamma", self.gamma)?;
        finite("rho", self.rho)?;
        finite("sigma", self.sigma)
    }

    /// Helper function to keep the main loop clean. Resolves default values that can
    /// only be known after the minimize function is called.
    #[inline]
    fn initialize_parameters(&self, dim: usize) -> (usize, f64, f64, f64, f64) {
        let maxiter = self.maxiter.unwrap_or(200 * dim);

        let (alpha, gamma, rho, sigma) = if self.adaptive && dim > 1 {
            let dim = dim as f64;
            (
                1.0,
                1.0 + 2.0 / dim,
                self.contraction.inside(0.75 - 1.0 / (2.0 * dim)),
                1.0 - 1.0 / dim,
            )
        } else {
            (self.alpha, self.gamma, self.rho, self.sigma)
        };

        (maxiter, alpha, gamma, rho, sigma)
    }

    /// Termination checks, in priority order. Assumes the simplex is ordered.
    #[inline]
    fn finished(
        &self,
        simplex: &Simplex,
        iterations: usize,
        maxiter: usize,
        nfeval: usize,
        elapsed: Duration,
        no_improv: usize,
    ) -> Option<RunStatus> {
        let n = simplex.len() - 1;
        if iterations >= maxiter {
            Some(RunStatus::MaxIterations)
        } else if self.maxfun.map_or(false, |maxfun| nfeval >= maxfun) {
            Some(RunStatus::MaxFunctionEvaluations)
        } else if self.max_time.map_or(false, |max_time| elapsed >= max_time) {
            Some(RunStatus::Timeout)
        } else if self.collapsed(simplex) {
            Some(RunStatus::DegenerateSimplex)
        } else if simplex[n].0 - simplex[0].0 < self.ftol {
            Some(RunStatus::Converged)
        } else if no_improv >= self.max_stagnant {
            Some(RunStatus::Stagnated)
        } else {
            None
        }
    }

    /// All vertices lie within `xtol` of the best one along every coordinate.
    #[inline]
    fn collapsed(&self, simplex: &Simplex) -> bool {
        let best = &simplex[0].1;
        simplex[1..].iter().all(|(_, xi)| {
            (xi - best)
                .mapv(f64::abs)
                .fold(0., |acc, &x| if acc > x { acc } else { x })
                <= self.xtol
        })
    }

    #[inline]
    fn contract(&self, centroid: &Array1<f64>, worst: &Array1<f64>, rho: f64) -> Array1<f64> {
        match self.contraction {
            Contraction::TowardWorst => centroid + &(rho * &(worst - centroid)),
            Contraction::AwayFromWorst => centroid + &(rho * &(centroid - worst)),
        }
    }

    /// shrink all points towards the best point.
    /// Assumes the simplex is ordered. Shrinkage requires n function evaluations.
    #[inline]
    fn shrink<F, E>(
        &self,
        simplex: &mut Simplex,
        f: &mut WrappedFunction<F>,
        sigma: f64,
    ) -> Result<(), E>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<f64, E>,
        E: std::error::Error + 'static,
    {
        let (best, rest) = simplex.split_at_mut(1);
        let x0 = &best[0].1;
        for (fi, xi) in rest.iter_mut() {
            *xi = x0 + &(sigma * &(&*xi - x0));
            *fi = f.call(xi.view())?;
        }
        Ok(())
    }

    /// calculate the centroid of all points but the worst one.
    /// Assumes that the simplex is ordered. This calculation is O(n^2).
    #[inline]
    fn centroid(&self, simplex: &Simplex) -> Array1<f64> {
        let n = simplex.len();
        let mut centroid = Array1::<f64>::zeros(simplex[0].1.len());
        for (_, xi) in simplex.iter().take(n - 1) {
            centroid += xi;
        }
        centroid / (n - 1) as f64
    }

    /// Stable sort by score, NaN ranks last.
    #[inline]
    fn order_simplex(&self, simplex: &mut Simplex) {
        simplex.sort_by(|&(fa, _), &(fb, _)| match (fa.is_nan(), fb.is_nan()) {
            (false, false) => fa.total_cmp(&fb),
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
        });
    }
}

/// Minimizes `obj_fn` from `x_start` with the given hyperparameters, in the order
/// `step, tolerance, max_stagnant, max_iter, alpha, gamma, rho, sigma`.
///
/// Equivalent to configuring a [`NelderMead`] with those values and the default
/// [`Contraction::TowardWorst`] convention.
///
/// ```
/// # use ndarray::prelude::*;
/// use simplex_optimize::nelder_mead;
/// use simplex_optimize::test_functions::styblinski_tang;
///
/// let res = nelder_mead(
///     styblinski_tang,
///     Array::from_vec(vec![-1.0, -1.0]).view(),
///     0.1,
///     1e-8,
///     25,
///     2000,
///     1.0,
///     2.0,
///     -0.5,
///     0.5,
/// )
/// .unwrap();
/// assert!((res.minimum_value + 78.332).abs() < 1e-2);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn nelder_mead<F>(
    obj_fn: F,
    x_start: ArrayView1<f64>,
    step: f64,
    tolerance: f64,
    max_stagnant: usize,
    max_iter: usize,
    alpha: f64,
    gamma: f64,
    rho: f64,
    sigma: f64,
) -> Result<OptimResult>
where
    F: Fn(ArrayView1<f64>) -> f64,
{
    let minimizer = NelderMead {
        step,
        ftol: tolerance,
        xtol: 1e-12,
        max_stagnant,
        maxiter: Some(max_iter),
        maxfun: None,
        max_time: None,
        alpha,
        gamma,
        rho,
        sigma,
        contraction: Contraction::TowardWorst,
        adaptive: false,
    };
    minimizer.minimize(obj_fn, x_start)
}
