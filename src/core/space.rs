use crate::error::ConfigError;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Inclusive range for a single coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }

    fn validate(&self, dimension: usize) -> Result<(), ConfigError> {
        if self.low.is_finite() && self.high.is_finite() && self.low < self.high && self.width().is_finite() {
            Ok(())
        } else {
            Err(ConfigError::InvalidBounds {
                dimension,
                low: self.low,
                high: self.high,
            })
        }
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// Box-bounded search space
///
/// Read-only once built; every position produced by an update rule is
/// projected back into it with [`BoundedSpace::clamp`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundedSpace {
    bounds: Vec<Bounds>,
}

impl BoundedSpace {
    /// Build a space from per-dimension bounds
    pub fn new(bounds: Vec<Bounds>) -> Result<Self, ConfigError> {
        if bounds.is_empty() {
            return Err(ConfigError::ZeroDimension);
        }
        for (i, b) in bounds.iter().enumerate() {
            b.validate(i)?;
        }
        Ok(Self { bounds })
    }

    /// Same `[low, high]` range on every dimension
    pub fn uniform(dimension: usize, low: f64, high: f64) -> Result<Self, ConfigError> {
        Self::new(vec![Bounds::new(low, high); dimension])
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }

    /// Project every coordinate into its range, in place
    #[inline]
    pub fn clamp(&self, position: &mut [f64]) {
        for (value, b) in position.iter_mut().zip(&self.bounds) {
            *value = b.clamp(*value);
        }
    }

    /// Clamped copy of `position`
    pub fn clamped(&self, position: &[f64]) -> Vec<f64> {
        let mut out = position.to_vec();
        self.clamp(&mut out);
        out
    }

    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.bounds.len()
            && position
                .iter()
                .zip(&self.bounds)
                .all(|(&v, b)| b.contains(v))
    }

    /// Draw a position uniformly within bounds
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.bounds
            .iter()
            .map(|b| rng.gen_range(b.low..=b.high))
            .collect()
    }
}
