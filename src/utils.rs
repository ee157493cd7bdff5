use crate::error::{OptimizeError, Result};
use ndarray::prelude::*;

/// Objective function that counts its own evaluations.
pub struct WrappedFunction<F> {
    pub num: usize,
    pub func: F,
}

impl<F> WrappedFunction<F> {
    pub fn new(func: F) -> Self {
        WrappedFunction { num: 0, func }
    }

    pub fn call<E>(&mut self, arg: ArrayView1<f64>) -> Result<f64, E>
    where
        F: Fn(ArrayView1<f64>) -> std::result::Result<f64, E>,
        E: std::error::Error + 'static,
    {
        self.num += 1;
        (self.func)(arg).map_err(OptimizeError::Objective)
    }
}
