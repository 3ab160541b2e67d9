use crate::core::{BoundedSpace, Population};
use crate::optimization::leaders::{Leader, LeaderSnapshot};
use crate::types::GenerationRecord;
use rand::RngCore;

/// Position of the current generation within the run's budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based index of the generation that was just evaluated
    pub index: usize,
    pub max_generations: usize,
}

impl Progress {
    /// Fraction of the budget consumed before this generation, in `[0, 1)`
    pub fn fraction(&self) -> f64 {
        if self.max_generations == 0 {
            return 0.0;
        }
        self.index as f64 / self.max_generations as f64
    }
}

/// What a callback sees after each generation's leader update
pub struct GenerationSnapshot<'a> {
    pub record: &'a GenerationRecord,
    pub population: &'a Population,
    pub leaders: LeaderSnapshot,
}

/// Callback interface for optimization progress
pub trait OptimizationCallback {
    /// Called once per generation, after evaluation and leader update
    fn on_generation(&mut self, snapshot: &GenerationSnapshot<'_>) -> Result<(), String>;

    /// Cooperative stop, checked between generations
    fn should_stop(&self) -> bool {
        false
    }
}

impl<T: OptimizationCallback + ?Sized> OptimizationCallback for &mut T {
    fn on_generation(&mut self, snapshot: &GenerationSnapshot<'_>) -> Result<(), String> {
        (**self).on_generation(snapshot)
    }

    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

/// Strategy-specific leader tracking and movement
///
/// The run calls `observe` for every agent in index order once evaluation of
/// the whole generation is done, then `advance` once to move the population.
pub trait UpdateRule: Send {
    fn name(&self) -> &str;

    /// Reset leader state and set up per-agent state for a fresh population
    fn initialize(&mut self, population: &mut Population, space: &BoundedSpace, rng: &mut dyn RngCore);

    /// Feed one evaluated agent into the leader tracker
    fn observe(&mut self, index: usize, position: &[f64], fitness: f64);

    /// Best solution found so far
    fn best(&self) -> &Leader;

    fn leaders(&self) -> LeaderSnapshot;

    /// Move every agent for the next generation; positions end up inside `space`
    fn advance(
        &mut self,
        population: &mut Population,
        space: &BoundedSpace,
        progress: Progress,
        rng: &mut dyn RngCore,
    );
}

/// Uniform draw on `[0, 1)`
#[inline]
pub(crate) fn unit(rng: &mut dyn RngCore) -> f64 {
    use rand::Rng;
    rng.sample(rand::distributions::Standard)
}
