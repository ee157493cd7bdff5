//! Derivative-free minimization of scalar functions with the Nelder-Mead simplex method.
//!
//! The objective maps a point, an [`ndarray::ArrayView1<f64>`], to a score where lower is
//! better. Objectives that can fail return a `Result` and go through
//! [`Minimizer::try_minimize`]; the first error ends the run and comes back as
//! [`OptimizeError::Objective`].
//!
//! ```
//! use ndarray::{array, prelude::*};
//! use simplex_optimize::test_functions::styblinski_tang;
//! use simplex_optimize::vector::NelderMeadBuilder;
//! use simplex_optimize::{Minimizer, RunStatus};
//!
//! let minimizer = NelderMeadBuilder::default()
//!     .step(0.1)
//!     .ftol(1e-8)
//!     .max_stagnant(25usize)
//!     .build()
//!     .unwrap();
//! let res = minimizer
//!     .minimize(styblinski_tang, array![-1.0, -1.0].view())
//!     .unwrap();
//! assert_eq!(res.status, RunStatus::Converged);
//! assert!((res.minimum[0] + 2.903534).abs() < 1e-3);
//! ```
//!
//! The library logs through the `log` facade and never installs a logger itself.

pub mod error;
pub mod minimizer;
pub mod test_functions;
mod utils;
pub mod vector;

pub use crate::error::{OptimizeError, Result};
pub use crate::minimizer::{Minimizer, OptimResult, RunStatus};
pub use crate::vector::nelder_mead;
