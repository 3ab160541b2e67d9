use super::config::RunConfig;
use super::evaluate::evaluate_population;
use crate::core::{BoundedSpace, Population};
use crate::error::{OptimizeError, OptimizeResult};
use crate::optimization::callback::NoopCallback;
use crate::optimization::leaders::{Leader, LeaderSnapshot};
use crate::optimization::problem::Objective;
use crate::optimization::solvers::{GenerationSnapshot, OptimizationCallback, Progress, UpdateRule};
use crate::types::{GenerationRecord, OptimizationResult, RunStatus};
use rand::RngCore;
use rayon::ThreadPool;
use tracing::{debug, error, info, warn};

/// A single optimization run: owns its population, leaders and random source.
///
/// Each call to [`step`](Self::step) executes one generation: clamp and
/// evaluate every agent, feed the fitness snapshot into the leader tracker in
/// index order, then move the population unless the run has just ended.
/// A generation that ends the run is not followed by a move.
pub struct OptimizationRun<'a, O, R> {
    config: RunConfig,
    space: BoundedSpace,
    objective: &'a O,
    rule: Box<dyn UpdateRule>,
    population: Population,
    rng: R,
    pool: Option<ThreadPool>,
    status: RunStatus,
    history: Vec<GenerationRecord>,
    evaluations: usize,
    stop_requested: bool,
}

impl<'a, O, R> OptimizationRun<'a, O, R>
where
    O: Objective,
    R: RngCore,
{
    pub(crate) fn new(
        config: RunConfig,
        space: BoundedSpace,
        objective: &'a O,
        mut rule: Box<dyn UpdateRule>,
        mut population: Population,
        mut rng: R,
        pool: Option<ThreadPool>,
    ) -> Self {
        population.clamp_all(&space);
        rule.initialize(&mut population, &space, &mut rng);

        Self {
            config,
            space,
            objective,
            rule,
            population,
            rng,
            pool,
            status: RunStatus::Initialized,
            history: Vec::new(),
            evaluations: 0,
            stop_requested: false,
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn space(&self) -> &BoundedSpace {
        &self.space
    }

    /// Current agents.
    ///
    /// While running, and after a cancellation through
    /// [`request_stop`](Self::request_stop), positions have already been moved
    /// for the next generation, so each `fitness` belongs to the agent's
    /// previous position. After any other terminal state the population is the
    /// one last evaluated. [`best`](Self::best) is always consistent.
    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn best(&self) -> &Leader {
        self.rule.best()
    }

    pub fn leaders(&self) -> LeaderSnapshot {
        self.rule.leaders()
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Ask the run to stop before its next generation.
    ///
    /// The population has already moved by then; see [`population`](Self::population).
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Execute one generation.
    ///
    /// Returns `Ok(None)` once the run is in a terminal state. An objective or
    /// callback error moves the run to [`RunStatus::Failed`].
    pub fn step(
        &mut self,
        callback: &mut dyn OptimizationCallback,
    ) -> OptimizeResult<Option<GenerationRecord>> {
        let generation = match self.status {
            RunStatus::Initialized if self.config.max_generations == 0 => 0,
            RunStatus::Initialized => 1,
            RunStatus::Running { generation } if self.stop_requested => {
                info!(generation, "Optimization cancelled");
                self.status = RunStatus::Cancelled { generation };
                return Ok(None);
            }
            RunStatus::Running { generation } => generation + 1,
            _ => return Ok(None),
        };

        if generation <= 1 {
            info!(
                strategy = self.rule.name(),
                dimension = self.space.dimension(),
                population = self.population.len(),
                max_generations = self.config.max_generations,
                parallel = self.pool.is_some(),
                "Optimization started"
            );
        }

        // (a) clamp and evaluate
        self.population.clamp_all(&self.space);
        if let Err(e) = evaluate_population(
            &mut self.population,
            self.objective,
            self.pool.as_ref(),
            generation,
        ) {
            error!(generation, error = %e, "Objective evaluation failed");
            self.status = RunStatus::Failed;
            return Err(e);
        }
        self.evaluations += self.population.len();

        // (b) leader update from the complete snapshot, in index order
        let mut anomalies = 0;
        let mut generation_best = f64::INFINITY;
        for (index, agent) in self.population.iter().enumerate() {
            if agent.fitness.is_finite() {
                generation_best = generation_best.min(agent.fitness);
            } else {
                anomalies += 1;
                warn!(generation, agent = index, fitness = agent.fitness, "Non-finite fitness ignored");
            }
            self.rule.observe(index, &agent.position, agent.fitness);
        }

        let record = GenerationRecord {
            generation,
            best_fitness: self.rule.best().fitness,
            generation_best,
            anomalies,
            evaluations: self.evaluations,
        };
        debug!(
            generation,
            best_fitness = record.best_fitness,
            generation_best,
            anomalies,
            "Generation complete"
        );
        self.history.push(record.clone());

        let snapshot = GenerationSnapshot {
            record: &record,
            population: &self.population,
            leaders: self.rule.leaders(),
        };
        if let Err(message) = callback.on_generation(&snapshot) {
            error!(generation, %message, "Callback aborted the run");
            self.status = RunStatus::Failed;
            return Err(OptimizeError::Callback(message));
        }

        self.status = if self.converged() {
            RunStatus::Converged { generation }
        } else if generation >= self.config.max_generations {
            RunStatus::BudgetExhausted { generation }
        } else if self.stop_requested || callback.should_stop() {
            RunStatus::Cancelled { generation }
        } else {
            // (c) move and (d) clamp for the next generation
            let progress = Progress {
                index: generation - 1,
                max_generations: self.config.max_generations,
            };
            self.rule
                .advance(&mut self.population, &self.space, progress, &mut self.rng);
            self.population.clamp_all(&self.space);
            RunStatus::Running { generation }
        };

        if self.status.is_terminal() {
            info!(
                status = self.status.describe(),
                generations = generation,
                best_fitness = record.best_fitness,
                evaluations = self.evaluations,
                "Optimization finished"
            );
        }

        Ok(Some(record))
    }

    fn converged(&self) -> bool {
        let best = self.rule.best().fitness;
        let termination = &self.config.termination;

        if let Some(target) = termination.target_fitness {
            if best <= target {
                return true;
            }
        }

        if let Some(stagnation) = termination.stagnation {
            let n = self.history.len();
            if n > stagnation.generations {
                let earlier = self.history[n - 1 - stagnation.generations].best_fitness;
                if earlier.is_finite() && earlier - best <= stagnation.tolerance {
                    return true;
                }
            }
        }

        false
    }

    /// Run generations until a terminal state
    pub fn run_to_end(&mut self, callback: &mut dyn OptimizationCallback) -> OptimizeResult<()> {
        while self.step(callback)?.is_some() {}
        Ok(())
    }

    pub fn into_result(self) -> OptimizationResult {
        let best = self.rule.best();
        OptimizationResult {
            status: self.status,
            strategy: self.rule.name().to_string(),
            best_position: best.position.clone(),
            best_fitness: best.fitness,
            leaders: self.rule.leaders(),
            evaluations: self.evaluations,
            history: self.history,
        }
    }
}

/// Generations are produced lazily; iteration ends at the terminal state.
impl<O, R> Iterator for OptimizationRun<'_, O, R>
where
    O: Objective,
    R: RngCore,
{
    type Item = OptimizeResult<GenerationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step(&mut NoopCallback).transpose()
    }
}
