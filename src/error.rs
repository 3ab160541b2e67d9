//! Error types for swarmopt
//!
//! Configuration problems are reported by [`ConfigError`] before a run starts.
//! Failures during a run are reported by [`OptimizeError`].

use thiserror::Error;

/// Error raised while validating a run configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Search space has no dimensions
    #[error("Dimension must be positive")]
    ZeroDimension,

    /// Population has no agents
    #[error("Population size must be positive")]
    ZeroPopulation,

    /// Bounds where low is not strictly below high, or not finite
    #[error("Invalid bounds for dimension {dimension}: low ({low}) must be finite and < high ({high})")]
    InvalidBounds { dimension: usize, low: f64, high: f64 },

    /// Per-dimension bounds or a seeded position do not match the dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Strategy selector not recognized
    #[error("Unknown strategy '{0}' (expected 'pso' or 'gwo')")]
    UnknownStrategy(String),

    /// Strategy coefficient outside its valid range
    #[error("Invalid coefficient {name} = {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },

    /// More seeded positions than agents
    #[error("Too many initial positions: {provided} for a population of {population}")]
    TooManyInitialPositions { provided: usize, population: usize },

    /// Worker count of zero
    #[error("Worker count must be positive")]
    ZeroWorkers,

    /// Stagnation window of zero generations
    #[error("Stagnation window must span at least one generation")]
    ZeroStagnationWindow,

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Top-level error type for optimization runs
#[derive(Debug, Error)]
pub enum OptimizeError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// Objective function returned an error; fatal to the run
    #[error("Objective evaluation failed for agent {agent} in generation {generation}: {message}")]
    ObjectiveEvaluation {
        agent: usize,
        generation: usize,
        message: String,
    },

    /// A callback aborted the run
    #[error("Callback aborted the run: {0}")]
    Callback(String),

    /// Evaluation thread pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type alias for optimization operations
pub type OptimizeResult<T> = Result<T, OptimizeError>;
