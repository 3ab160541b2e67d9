use super::traits::{Progress, UpdateRule, unit};
use crate::core::{BoundedSpace, Population};
use crate::error::ConfigError;
use crate::optimization::leaders::{Leader, LeaderSnapshot, SwarmLeaders};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Inertia weight `w`, constant or linearly decayed over the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inertia {
    Constant(f64),
    Linear { start: f64, end: f64 },
}

impl Inertia {
    pub fn at(&self, progress: Progress) -> f64 {
        match *self {
            Self::Constant(w) => w,
            Self::Linear { start, end } => start - (start - end) * progress.fraction(),
        }
    }
}

impl Default for Inertia {
    fn default() -> Self {
        Self::Constant(0.7)
    }
}

/// Particle swarm coefficients
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsoParams {
    pub inertia: Inertia,
    /// c1 - personal best influence
    pub cognitive: f64,
    /// c2 - global best influence
    pub social: f64,
    /// Velocity limit as a fraction of each dimension's width
    pub velocity_clamp: f64,
    /// Initial velocities are drawn from +/- this fraction of each dimension's width
    pub initial_velocity: f64,
}

impl Default for PsoParams {
    fn default() -> Self {
        Self {
            inertia: Inertia::default(),
            cognitive: 1.5,
            social: 1.5,
            velocity_clamp: 0.2,
            initial_velocity: 0.1,
        }
    }
}

impl PsoParams {
    pub fn with_inertia(mut self, inertia: Inertia) -> Self {
        self.inertia = inertia;
        self
    }

    /// Configure acceleration coefficients (defaults: c1=1.5, c2=1.5)
    pub fn with_coefficients(mut self, cognitive: f64, social: f64) -> Self {
        self.cognitive = cognitive;
        self.social = social;
        self
    }

    pub fn with_velocity_clamp(mut self, fraction: f64) -> Self {
        self.velocity_clamp = fraction;
        self
    }

    pub fn with_initial_velocity(mut self, fraction: f64) -> Self {
        self.initial_velocity = fraction;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = match self.inertia {
            Inertia::Constant(w) => vec![("inertia", w)],
            Inertia::Linear { start, end } => vec![("inertia.start", start), ("inertia.end", end)],
        };
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::InvalidCoefficient { name, value });
            }
        }
        for (name, value) in [("cognitive", self.cognitive), ("social", self.social)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidCoefficient { name, value });
            }
        }
        if !self.velocity_clamp.is_finite() || self.velocity_clamp <= 0.0 {
            return Err(ConfigError::InvalidCoefficient {
                name: "velocity_clamp",
                value: self.velocity_clamp,
            });
        }
        if !self.initial_velocity.is_finite() || self.initial_velocity < 0.0 {
            return Err(ConfigError::InvalidCoefficient {
                name: "initial_velocity",
                value: self.initial_velocity,
            });
        }
        Ok(())
    }
}

/// Particle Swarm Optimization
pub struct ParticleSwarm {
    params: PsoParams,
    leaders: SwarmLeaders,
}

impl ParticleSwarm {
    pub fn new(params: PsoParams) -> Self {
        Self {
            params,
            leaders: SwarmLeaders::new(std::iter::empty(), 0),
        }
    }

    pub fn params(&self) -> &PsoParams {
        &self.params
    }

    pub fn swarm_leaders(&self) -> &SwarmLeaders {
        &self.leaders
    }
}

impl UpdateRule for ParticleSwarm {
    fn name(&self) -> &str {
        "PSO"
    }

    fn initialize(&mut self, population: &mut Population, space: &BoundedSpace, rng: &mut dyn RngCore) {
        let fraction = self.params.initial_velocity;
        for agent in population.iter_mut() {
            let velocity = space
                .bounds()
                .iter()
                .map(|b| {
                    let limit = b.width() * fraction;
                    if limit > 0.0 {
                        rng.gen_range(-limit..=limit)
                    } else {
                        0.0
                    }
                })
                .collect();
            agent.velocity = Some(velocity);
        }
        self.leaders = SwarmLeaders::new(
            population.iter().map(|a| a.position.as_slice()),
            space.dimension(),
        );
    }

    fn observe(&mut self, index: usize, position: &[f64], fitness: f64) {
        self.leaders.update(index, position, fitness);
    }

    fn best(&self) -> &Leader {
        self.leaders.global()
    }

    fn leaders(&self) -> LeaderSnapshot {
        LeaderSnapshot::Global {
            best: self.leaders.global().clone(),
        }
    }

    fn advance(
        &mut self,
        population: &mut Population,
        space: &BoundedSpace,
        progress: Progress,
        rng: &mut dyn RngCore,
    ) {
        let w = self.params.inertia.at(progress);
        let c1 = self.params.cognitive;
        let c2 = self.params.social;
        let global = self.leaders.global();

        for (p, agent) in population.iter_mut().enumerate() {
            let dim = agent.position.len();
            let personal = self.leaders.personal(p).map(|l| l.position.as_slice());
            let velocity = agent.velocity.get_or_insert_with(|| vec![0.0; dim]);

            for (i, b) in space.bounds().iter().enumerate() {
                let r1 = unit(rng);
                let r2 = unit(rng);
                let x = agent.position[i];
                let pbest = personal.map_or(x, |pb| pb[i]);
                // an unset global best sits at the origin
                let gbest = global.position[i];

                let v = w * velocity[i] + c1 * r1 * (pbest - x) + c2 * r2 * (gbest - x);

                let v_max = b.width() * self.params.velocity_clamp;
                velocity[i] = v.clamp(-v_max, v_max);
                agent.position[i] = x + velocity[i];
            }

            space.clamp(&mut agent.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Agent;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn population(points: &[f64]) -> Population {
        Population::new(points.iter().map(|&x| Agent::new(vec![x])).collect())
    }

    #[test]
    fn test_linear_inertia() {
        let inertia = Inertia::Linear { start: 0.7, end: 0.4 };
        let at = |index| {
            inertia.at(Progress {
                index,
                max_generations: 10,
            })
        };
        assert_relative_eq!(at(0), 0.7);
        assert_relative_eq!(at(5), 0.55);
        assert_relative_eq!(Inertia::Constant(0.9).at(Progress { index: 7, max_generations: 10 }), 0.9);
    }

    #[test]
    fn test_initial_velocities_within_fraction() {
        let mut rng = StdRng::seed_from_u64(1);
        let space = BoundedSpace::uniform(3, -5.0, 5.0).unwrap();
        let mut pop = Population::new((0..10).map(|_| Agent::new(space.sample(&mut rng))).collect());
        let mut swarm = ParticleSwarm::new(PsoParams::default());
        swarm.initialize(&mut pop, &space, &mut rng);

        for agent in pop.iter() {
            let v = agent.velocity.as_ref().unwrap();
            assert_eq!(v.len(), 3);
            assert!(v.iter().all(|x| x.abs() <= 1.0));
        }
        assert_eq!(swarm.swarm_leaders().personal_bests().len(), 10);
        assert!(!swarm.best().is_set());
    }

    #[test]
    fn test_zero_coefficients_do_not_move() {
        let mut rng = StdRng::seed_from_u64(2);
        let space = BoundedSpace::uniform(1, -5.0, 5.0).unwrap();
        let mut pop = population(&[3.0, -1.0]);
        let params = PsoParams::default()
            .with_inertia(Inertia::Constant(0.0))
            .with_coefficients(0.0, 0.0);
        let mut swarm = ParticleSwarm::new(params);
        swarm.initialize(&mut pop, &space, &mut rng);
        swarm.observe(0, &[3.0], 9.0);
        swarm.observe(1, &[-1.0], 1.0);

        let progress = Progress {
            index: 0,
            max_generations: 5,
        };
        swarm.advance(&mut pop, &space, progress, &mut rng);
        assert_eq!(pop.positions(), vec![vec![3.0], vec![-1.0]]);
    }

    #[test]
    fn test_unset_global_best_pulls_toward_origin() {
        let mut rng = StdRng::seed_from_u64(6);
        let space = BoundedSpace::uniform(1, -10.0, 10.0).unwrap();
        let mut pop = population(&[4.0]);
        let params = PsoParams::default()
            .with_inertia(Inertia::Constant(0.0))
            .with_coefficients(0.0, 1.0)
            .with_velocity_clamp(1.0);
        let mut swarm = ParticleSwarm::new(params);
        swarm.initialize(&mut pop, &space, &mut rng);
        // non-finite fitness leaves the global best unset
        swarm.observe(0, &[4.0], f64::NAN);
        assert!(!swarm.best().is_set());

        let progress = Progress {
            index: 0,
            max_generations: 5,
        };
        swarm.advance(&mut pop, &space, progress, &mut rng);
        // v = r2 * (0 - 4), so the particle lands in (0, 4]
        let x = pop.positions()[0][0];
        assert!((0.0..=4.0).contains(&x));
        assert_relative_eq!(pop.get(0).unwrap().velocity.as_ref().unwrap()[0], x - 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_clamped_to_fraction_of_width() {
        let mut rng = StdRng::seed_from_u64(3);
        let space = BoundedSpace::uniform(2, 0.0, 10.0).unwrap();
        let mut pop = population(&[0.0]);
        pop.iter_mut().next().unwrap().position = vec![0.0, 0.0];
        let params = PsoParams::default()
            .with_inertia(Inertia::Constant(0.0))
            .with_coefficients(0.0, 100.0)
            .with_velocity_clamp(0.1);
        let mut swarm = ParticleSwarm::new(params);
        swarm.initialize(&mut pop, &space, &mut rng);
        swarm.observe(0, &[10.0, 10.0], 1.0);

        let progress = Progress {
            index: 0,
            max_generations: 5,
        };
        swarm.advance(&mut pop, &space, progress, &mut rng);
        let agent = pop.get(0).unwrap();
        for (&v, &x) in agent.velocity.as_ref().unwrap().iter().zip(&agent.position) {
            assert!(v.abs() <= 1.0 + 1e-12);
            assert_relative_eq!(x, v);
        }
        assert!(pop.all_within(&space));
    }

    #[test]
    fn test_positions_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(4);
        let space = BoundedSpace::uniform(2, -1.0, 1.0).unwrap();
        let mut pop = Population::new((0..8).map(|_| Agent::new(space.sample(&mut rng))).collect());
        let params = PsoParams::default().with_velocity_clamp(5.0);
        let mut swarm = ParticleSwarm::new(params);
        swarm.initialize(&mut pop, &space, &mut rng);

        for index in 0..20 {
            for (i, agent) in pop.iter().enumerate() {
                let f: f64 = agent.position.iter().map(|x| (x - 0.9) * (x - 0.9)).sum();
                swarm.observe(i, &agent.position, f);
            }
            let progress = Progress {
                index,
                max_generations: 20,
            };
            swarm.advance(&mut pop, &space, progress, &mut rng);
            assert!(pop.all_within(&space));
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(PsoParams::default().validate().is_ok());
        assert_eq!(
            PsoParams::default().with_velocity_clamp(0.0).validate(),
            Err(ConfigError::InvalidCoefficient {
                name: "velocity_clamp",
                value: 0.0
            })
        );
        assert!(PsoParams::default().with_coefficients(f64::NAN, 1.0).validate().is_err());
        assert!(
            PsoParams::default()
                .with_inertia(Inertia::Linear { start: 0.9, end: f64::INFINITY })
                .validate()
                .is_err()
        );
    }
}
