//! # swarmopt
//!
//! Population-based minimization of a real-valued objective over a box-bounded
//! search space, with two strategies sharing one engine:
//!
//! - **PSO**: particle swarm with personal/global bests, inertia (constant or
//!   linearly decayed) and velocity clamping.
//! - **GWO**: grey wolf pack led by a ranked alpha/beta/delta triple and a
//!   linearly decaying encircling coefficient.
//!
//! ```rust,ignore
//! use swarmopt::prelude::*;
//!
//! let config = RunConfig::new(5, -10.0, 10.0)
//!     .with_population_size(20)
//!     .with_max_generations(50)
//!     .with_strategy(StrategyConfig::Gwo(GwoParams::default()))
//!     .with_seed(42);
//!
//! let result = Optimizer::new(config)?.minimize(&Rosenbrock::default())?;
//! println!("{:?} -> {}", result.best_position, result.best_fitness);
//! ```

pub mod core;
pub mod error;
pub mod optimization;
pub mod optimizer;
pub mod types;

pub use crate::core::{Agent, BoundedSpace, Bounds, Population};
pub use error::{ConfigError, OptimizeError, OptimizeResult};
pub use optimization::*;
pub use optimizer::{
    BoundsSpec, OptimizationRun, Optimizer, RunConfig, Stagnation, StrategyConfig, StrategyKind, Termination,
};
pub use types::{GenerationRecord, OptimizationResult, RunStatus};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{Agent, BoundedSpace, Bounds, Population};
    pub use crate::error::*;
    pub use crate::optimization::*;
    pub use crate::optimizer::*;
    pub use crate::types::*;
}
