mod grey_wolf;
mod particle;
pub mod traits;

pub use grey_wolf::{GreyWolfPack, GwoParams};
pub use particle::{Inertia, ParticleSwarm, PsoParams};
pub use traits::{GenerationSnapshot, OptimizationCallback, Progress, UpdateRule};

use crate::optimizer::StrategyConfig;

/// Instantiate the update rule selected by the strategy configuration
pub fn build_rule(strategy: &StrategyConfig) -> Box<dyn UpdateRule> {
    match strategy {
        StrategyConfig::Pso(params) => Box::new(ParticleSwarm::new(*params)),
        StrategyConfig::Gwo(params) => Box::new(GreyWolfPack::new(*params)),
    }
}
