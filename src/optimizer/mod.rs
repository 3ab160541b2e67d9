mod config;
mod evaluate;
mod run;

pub use config::{BoundsSpec, RunConfig, Stagnation, StrategyConfig, StrategyKind, Termination};
pub use run::OptimizationRun;

use crate::core::{Agent, BoundedSpace, Population};
use crate::error::{ConfigError, OptimizeResult};
use crate::optimization::callback::NoopCallback;
use crate::optimization::problem::Objective;
use crate::optimization::solvers::{OptimizationCallback, build_rule};
use crate::types::OptimizationResult;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Validated run configuration plus optional seeded starting positions
#[derive(Debug, Clone)]
pub struct Optimizer {
    config: RunConfig,
    space: BoundedSpace,
    initial_positions: Vec<Vec<f64>>,
}

impl Optimizer {
    /// Validate `config`; fails fast on any configuration error
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let space = config.validate()?;
        Ok(Self {
            config,
            space,
            initial_positions: Vec::new(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(RunConfig::from_json(json)?)
    }

    /// Start the first agents at the given positions (clamped into bounds);
    /// the rest are drawn uniformly
    pub fn with_initial_positions(mut self, positions: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        if positions.len() > self.config.population_size {
            return Err(ConfigError::TooManyInitialPositions {
                provided: positions.len(),
                population: self.config.population_size,
            });
        }
        if let Some(bad) = positions.iter().find(|p| p.len() != self.space.dimension()) {
            return Err(ConfigError::DimensionMismatch {
                expected: self.space.dimension(),
                actual: bad.len(),
            });
        }
        self.initial_positions = positions;
        Ok(self)
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn space(&self) -> &BoundedSpace {
        &self.space
    }

    /// Start a run with the configured seed, or entropy when none is set
    pub fn start<'a, O: Objective>(&self, objective: &'a O) -> OptimizeResult<OptimizationRun<'a, O, StdRng>> {
        let rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.start_with_rng(objective, rng)
    }

    /// Start a run drawing all randomness from `rng`
    pub fn start_with_rng<'a, O, R>(&self, objective: &'a O, mut rng: R) -> OptimizeResult<OptimizationRun<'a, O, R>>
    where
        O: Objective,
        R: RngCore,
    {
        let pool = if self.config.parallel {
            Some(evaluate::build_pool(self.config.workers)?)
        } else {
            None
        };

        let agents = (0..self.config.population_size)
            .map(|i| {
                let position = match self.initial_positions.get(i) {
                    Some(p) => self.space.clamped(p),
                    None => self.space.sample(&mut rng),
                };
                Agent::new(position)
            })
            .collect();

        Ok(OptimizationRun::new(
            self.config.clone(),
            self.space.clone(),
            objective,
            build_rule(&self.config.strategy),
            Population::new(agents),
            rng,
            pool,
        ))
    }

    /// Run to completion and return the best solution found
    pub fn minimize<O: Objective>(&self, objective: &O) -> OptimizeResult<OptimizationResult> {
        self.minimize_with(objective, &mut NoopCallback)
    }

    pub fn minimize_with<O: Objective>(
        &self,
        objective: &O,
        callback: &mut dyn OptimizationCallback,
    ) -> OptimizeResult<OptimizationResult> {
        let mut run = self.start(objective)?;
        run.run_to_end(callback)?;
        Ok(run.into_result())
    }
}
