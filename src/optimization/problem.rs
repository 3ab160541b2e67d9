//! Objective functions
//!
//! Objectives are [`argmin`] cost functions over `Vec<f64>` returning a scalar
//! fitness to minimize. They must be deterministic and `Sync` so a generation
//! can be evaluated in parallel.

use argmin::core::{CostFunction, Error};

/// Any argmin cost function usable by the optimizer
pub trait Objective: CostFunction<Param = Vec<f64>, Output = f64> + Sync {}

impl<T> Objective for T where T: CostFunction<Param = Vec<f64>, Output = f64> + Sync {}

/// Objective backed by an infallible closure
pub struct FnProblem<F> {
    f: F,
}

impl<F> FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CostFunction for FnProblem<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        Ok((self.f)(param))
    }
}

/// Objective backed by a closure that can reject inputs outside its domain
pub struct FallibleProblem<F> {
    f: F,
}

impl<F> FallibleProblem<F>
where
    F: Fn(&[f64]) -> Result<f64, Error> + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> CostFunction for FallibleProblem<F>
where
    F: Fn(&[f64]) -> Result<f64, Error> + Sync,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        (self.f)(param)
    }
}

/// Sphere function: sum of squares, minimum 0 at the origin
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl CostFunction for Sphere {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        Ok(param.iter().map(|x| x * x).sum())
    }
}

/// Rosenbrock function (chained n-dimensional form), minimum 0 at `(a, ..., a)`
#[derive(Debug, Clone, Copy)]
pub struct Rosenbrock {
    pub a: f64,
    pub b: f64,
}

impl Default for Rosenbrock {
    fn default() -> Self {
        Self { a: 1.0, b: 100.0 }
    }
}

impl CostFunction for Rosenbrock {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        if param.len() < 2 {
            return Err(Error::msg(format!(
                "Rosenbrock needs at least 2 dimensions, got {}",
                param.len()
            )));
        }
        Ok(param
            .windows(2)
            .map(|w| (self.a - w[0]).powi(2) + self.b * (w[1] - w[0] * w[0]).powi(2))
            .sum())
    }
}

/// Rastrigin function, minimum 0 at the origin
#[derive(Debug, Clone, Copy)]
pub struct Rastrigin {
    pub amplitude: f64,
}

impl Default for Rastrigin {
    fn default() -> Self {
        Self { amplitude: 10.0 }
    }
}

impl CostFunction for Rastrigin {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, Error> {
        let a = self.amplitude;
        Ok(a * param.len() as f64
            + param
                .iter()
                .map(|x| x * x - a * (2.0 * std::f64::consts::PI * x).cos())
                .sum::<f64>())
    }
}
