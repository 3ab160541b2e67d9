use super::traits::{Progress, UpdateRule, unit};
use crate::core::{BoundedSpace, Population};
use crate::error::ConfigError;
use crate::optimization::leaders::{Leader, LeaderSnapshot, PackLeaders};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Grey wolf coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GwoParams {
    /// Starting value of the encircling coefficient `a`, decayed linearly to 0
    pub a_initial: f64,
}

impl Default for GwoParams {
    fn default() -> Self {
        Self { a_initial: 2.0 }
    }
}

impl GwoParams {
    pub fn with_a_initial(mut self, a_initial: f64) -> Self {
        self.a_initial = a_initial;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.a_initial.is_finite() || self.a_initial < 0.0 {
            return Err(ConfigError::InvalidCoefficient {
                name: "a_initial",
                value: self.a_initial,
            });
        }
        Ok(())
    }

    /// `a` for the given generation
    pub fn a(&self, progress: Progress) -> f64 {
        self.a_initial - self.a_initial * progress.fraction()
    }
}

/// Grey Wolf Optimization
pub struct GreyWolfPack {
    params: GwoParams,
    leaders: PackLeaders,
}

impl GreyWolfPack {
    pub fn new(params: GwoParams) -> Self {
        Self {
            params,
            leaders: PackLeaders::new(0),
        }
    }

    pub fn params(&self) -> &GwoParams {
        &self.params
    }

    pub fn pack(&self) -> &PackLeaders {
        &self.leaders
    }

    /// Positions the pack hunts toward; unset leaders sit at the origin
    fn guides(&self) -> [&[f64]; 3] {
        [
            self.leaders.alpha().position.as_slice(),
            self.leaders.beta().position.as_slice(),
            self.leaders.delta().position.as_slice(),
        ]
    }
}

impl UpdateRule for GreyWolfPack {
    fn name(&self) -> &str {
        "GWO"
    }

    fn initialize(&mut self, population: &mut Population, space: &BoundedSpace, _rng: &mut dyn RngCore) {
        for agent in population.iter_mut() {
            agent.velocity = None;
        }
        self.leaders = PackLeaders::new(space.dimension());
    }

    fn observe(&mut self, _index: usize, position: &[f64], fitness: f64) {
        self.leaders.update(position, fitness);
    }

    fn best(&self) -> &Leader {
        self.leaders.alpha()
    }

    fn leaders(&self) -> LeaderSnapshot {
        LeaderSnapshot::Pack {
            alpha: self.leaders.alpha().clone(),
            beta: self.leaders.beta().clone(),
            delta: self.leaders.delta().clone(),
        }
    }

    fn advance(
        &mut self,
        population: &mut Population,
        space: &BoundedSpace,
        progress: Progress,
        rng: &mut dyn RngCore,
    ) {
        let a = self.params.a(progress);
        let guides = self.guides();

        for agent in population.iter_mut() {
            let next: Vec<f64> = agent
                .position
                .iter()
                .enumerate()
                .map(|(d, &x)| {
                    let mut sum = 0.0;
                    for leader in guides {
                        let r1 = unit(rng);
                        let r2 = unit(rng);
                        let big_a = 2.0 * a * r1 - a;
                        let c = 2.0 * r2;
                        let distance = (c * leader[d] - x).abs();
                        sum += leader[d] - big_a * distance;
                    }
                    sum / 3.0
                })
                .collect();

            agent.position = next;
            space.clamp(&mut agent.position);
        }
    }
}
