use crate::core::{BoundedSpace, Bounds};
use crate::error::ConfigError;
use crate::optimization::solvers::{GwoParams, PsoParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search-space bounds: one range for every dimension, or one per dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundsSpec {
    Uniform(f64, f64),
    PerDimension(Vec<(f64, f64)>),
}

impl BoundsSpec {
    pub fn resolve(&self, dimension: usize) -> Result<BoundedSpace, ConfigError> {
        if dimension == 0 {
            return Err(ConfigError::ZeroDimension);
        }
        match self {
            Self::Uniform(low, high) => BoundedSpace::uniform(dimension, *low, *high),
            Self::PerDimension(pairs) => {
                if pairs.len() != dimension {
                    return Err(ConfigError::DimensionMismatch {
                        expected: dimension,
                        actual: pairs.len(),
                    });
                }
                BoundedSpace::new(pairs.iter().copied().map(Bounds::from).collect())
            }
        }
    }
}

/// Strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Pso,
    Gwo,
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pso" => Ok(Self::Pso),
            "gwo" => Ok(Self::Gwo),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pso => write!(f, "pso"),
            Self::Gwo => write!(f, "gwo"),
        }
    }
}

/// Strategy selector together with its coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrategyConfig {
    Pso(PsoParams),
    Gwo(GwoParams),
}

impl StrategyConfig {
    /// Default coefficients for a strategy
    pub fn defaults(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Pso => Self::Pso(PsoParams::default()),
            StrategyKind::Gwo => Self::Gwo(GwoParams::default()),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Pso(_) => StrategyKind::Pso,
            Self::Gwo(_) => StrategyKind::Gwo,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Pso(params) => params.validate(),
            Self::Gwo(params) => params.validate(),
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::defaults(StrategyKind::Pso)
    }
}

/// Convergence window: stop once the best fitness improves by no more than
/// `tolerance` over `generations` consecutive generations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stagnation {
    pub generations: usize,
    pub tolerance: f64,
}

/// Early stopping on top of the generation budget
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Termination {
    pub target_fitness: Option<f64>,
    pub stagnation: Option<Stagnation>,
}

fn default_population_size() -> usize {
    30
}

fn default_max_generations() -> usize {
    100
}

/// Immutable configuration of an optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub dimension: usize,
    pub bounds: BoundsSpec,
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Zero evaluates the initial population once and stops
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub termination: Termination,
    /// Evaluate each generation on a thread pool
    #[serde(default)]
    pub parallel: bool,
    /// Thread pool size (default: number of CPUs)
    #[serde(default)]
    pub workers: Option<usize>,
}

impl RunConfig {
    pub fn new(dimension: usize, low: f64, high: f64) -> Self {
        Self {
            dimension,
            bounds: BoundsSpec::Uniform(low, high),
            population_size: default_population_size(),
            max_generations: default_max_generations(),
            strategy: StrategyConfig::default(),
            random_seed: None,
            termination: Termination::default(),
            parallel: false,
            workers: None,
        }
    }

    /// Per-dimension bounds; the dimension is the number of pairs
    pub fn with_bounds(bounds: Vec<(f64, f64)>) -> Self {
        Self {
            dimension: bounds.len(),
            bounds: BoundsSpec::PerDimension(bounds),
            ..Self::new(0, 0.0, 0.0)
        }
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.termination.target_fitness = Some(target);
        self
    }

    pub fn with_stagnation(mut self, generations: usize, tolerance: f64) -> Self {
        self.termination.stagnation = Some(Stagnation {
            generations,
            tolerance,
        });
        self
    }

    /// Evaluate in parallel; `workers = None` uses one thread per CPU
    pub fn with_parallel(mut self, workers: Option<usize>) -> Self {
        self.parallel = true;
        self.workers = workers;
        self
    }

    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;

        // the selector is matched like `StrategyKind::from_str`, so an unknown
        // name is reported as such and "PSO" or " gwo " are accepted
        if let Some(kind) = value.pointer_mut("/strategy/kind") {
            if let Some(name) = kind.as_str() {
                let parsed: StrategyKind = name.parse()?;
                *kind = serde_json::Value::String(parsed.to_string());
            }
        }

        let config: Self =
            serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every option and build the search space
    pub fn validate(&self) -> Result<BoundedSpace, ConfigError> {
        let space = self.bounds.resolve(self.dimension)?;
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        self.strategy.validate()?;
        if let StrategyConfig::Pso(params) = &self.strategy {
            // velocity ranges are drawn and clamped as +/- fraction * width
            for (name, fraction) in [
                ("velocity_clamp", params.velocity_clamp),
                ("initial_velocity", params.initial_velocity),
            ] {
                if space.bounds().iter().any(|b| !(2.0 * b.width() * fraction).is_finite()) {
                    return Err(ConfigError::InvalidCoefficient { name, value: fraction });
                }
            }
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        if let Some(target) = self.termination.target_fitness {
            if target.is_nan() {
                return Err(ConfigError::InvalidCoefficient {
                    name: "target_fitness",
                    value: target,
                });
            }
        }
        if let Some(stagnation) = self.termination.stagnation {
            if stagnation.generations == 0 {
                return Err(ConfigError::ZeroStagnationWindow);
            }
            if !stagnation.tolerance.is_finite() || stagnation.tolerance < 0.0 {
                return Err(ConfigError::InvalidCoefficient {
                    name: "stagnation.tolerance",
                    value: stagnation.tolerance,
                });
            }
        }
        Ok(space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::solvers::Inertia;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new(5, -10.0, 10.0);
        assert_eq!(config.population_size, 30);
        assert_eq!(config.max_generations, 100);
        assert_eq!(config.strategy.kind(), StrategyKind::Pso);
        assert_eq!(config.validate().unwrap().dimension(), 5);
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            RunConfig::new(0, -1.0, 1.0).validate(),
            Err(ConfigError::ZeroDimension)
        );
        assert_eq!(
            RunConfig::new(2, 1.0, -1.0).validate(),
            Err(ConfigError::InvalidBounds {
                dimension: 0,
                low: 1.0,
                high: -1.0
            })
        );
        assert_eq!(
            RunConfig::new(2, -1.0, 1.0).with_population_size(0).validate(),
            Err(ConfigError::ZeroPopulation)
        );
        assert_eq!(
            RunConfig::new(2, -1.0, 1.0).with_parallel(Some(0)).validate(),
            Err(ConfigError::ZeroWorkers)
        );
        assert_eq!(
            RunConfig::new(2, -1.0, 1.0).with_stagnation(0, 1e-6).validate(),
            Err(ConfigError::ZeroStagnationWindow)
        );

        assert_eq!(
            RunConfig::new(2, -1e308, 1e308).validate(),
            Err(ConfigError::InvalidBounds {
                dimension: 0,
                low: -1e308,
                high: 1e308
            })
        );
        let huge_velocity = StrategyConfig::Pso(PsoParams::default().with_initial_velocity(1e300));
        assert_eq!(
            RunConfig::new(1, -1e10, 1e10).with_strategy(huge_velocity).validate(),
            Err(ConfigError::InvalidCoefficient {
                name: "initial_velocity",
                value: 1e300
            })
        );

        let mut mismatched = RunConfig::with_bounds(vec![(0.0, 1.0), (0.0, 2.0)]);
        mismatched.dimension = 3;
        assert_eq!(
            mismatched.validate(),
            Err(ConfigError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_zero_generations_allowed() {
        assert!(RunConfig::new(1, -1.0, 1.0).with_max_generations(0).validate().is_ok());
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("PSO".parse::<StrategyKind>(), Ok(StrategyKind::Pso));
        assert_eq!(" gwo ".parse::<StrategyKind>(), Ok(StrategyKind::Gwo));
        assert_eq!(
            "ant".parse::<StrategyKind>(),
            Err(ConfigError::UnknownStrategy("ant".into()))
        );
        assert_eq!(StrategyKind::Gwo.to_string(), "gwo");
    }

    #[test]
    fn test_from_json() {
        let config = RunConfig::from_json(
            r#"{
                "dimension": 2,
                "bounds": [[-5.0, 5.0], [0.0, 1.0]],
                "population_size": 8,
                "max_generations": 20,
                "strategy": {"kind": "pso", "inertia": {"start": 0.7, "end": 0.4}, "velocity_clamp": 0.5},
                "random_seed": 42,
                "termination": {"target_fitness": 1e-8}
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.bounds,
            BoundsSpec::PerDimension(vec![(-5.0, 5.0), (0.0, 1.0)])
        );
        assert_eq!(config.random_seed, Some(42));
        assert_eq!(config.termination.target_fitness, Some(1e-8));
        match config.strategy {
            StrategyConfig::Pso(p) => {
                assert_eq!(p.inertia, Inertia::Linear { start: 0.7, end: 0.4 });
                assert_eq!(p.velocity_clamp, 0.5);
                assert_eq!(p.cognitive, 1.5);
            }
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn test_from_json_uniform_bounds_and_gwo() {
        let config = RunConfig::from_json(
            r#"{"dimension": 5, "bounds": [-10, 10], "strategy": {"kind": "gwo"}}"#,
        )
        .unwrap();
        assert_eq!(config.bounds, BoundsSpec::Uniform(-10.0, 10.0));
        assert_eq!(config.strategy, StrategyConfig::Gwo(GwoParams::default()));
        assert_eq!(config.population_size, 30);
    }

    #[test]
    fn test_from_json_unknown_strategy() {
        let err = RunConfig::from_json(
            r#"{"dimension": 1, "bounds": [0, 1], "strategy": {"kind": "aco"}}"#,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::UnknownStrategy("aco".into()));
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        let err = RunConfig::from_json(r#"{"dimension": 1, "bounds": [1, 0]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBounds { .. }));

        let err = RunConfig::from_json(r#"{"dimension": 1, "bounds": [0, 1], "colour": 3}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_strategy_name_is_case_insensitive() {
        let pso = RunConfig::from_json(
            r#"{"dimension": 2, "bounds": [-1, 1], "strategy": {"kind": "PSO", "cognitive": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(
            pso.strategy,
            StrategyConfig::Pso(PsoParams::default().with_coefficients(2.0, 1.5))
        );

        let gwo = RunConfig::from_json(r#"{"dimension": 2, "bounds": [-1, 1], "strategy": {"kind": " gwo "}}"#)
            .unwrap();
        assert_eq!(gwo.strategy.kind(), StrategyKind::Gwo);
        assert_eq!(" Gwo ".parse::<StrategyKind>().unwrap(), gwo.strategy.kind());
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = RunConfig::new(3, -1.0, 1.0)
            .with_strategy(StrategyConfig::Gwo(GwoParams::default().with_a_initial(1.5)))
            .with_seed(9)
            .with_stagnation(10, 1e-9);
        let json = config.to_json().unwrap();
        assert_eq!(RunConfig::from_json(&json).unwrap(), config);
    }
}
