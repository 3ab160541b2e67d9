use super::solvers::traits::{GenerationSnapshot, OptimizationCallback};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Callback that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl OptimizationCallback for NoopCallback {
    fn on_generation(&mut self, _snapshot: &GenerationSnapshot<'_>) -> Result<(), String> {
        Ok(())
    }
}

/// Logs the best fitness every `every` generations
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    every: usize,
}

impl ProgressLogger {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for ProgressLogger {
    fn default() -> Self {
        Self::new(5)
    }
}

impl OptimizationCallback for ProgressLogger {
    fn on_generation(&mut self, snapshot: &GenerationSnapshot<'_>) -> Result<(), String> {
        let record = snapshot.record;
        if record.generation % self.every == 0 || record.generation == 1 {
            info!(
                generation = record.generation,
                best_fitness = record.best_fitness,
                generation_best = record.generation_best,
                evaluations = record.evaluations,
                "Iter {:4}: Best fitness = {:.6e}",
                record.generation,
                record.best_fitness
            );
        }
        Ok(())
    }
}

/// Positions and velocities of every agent for one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryFrame {
    pub generation: usize,
    pub positions: Vec<Vec<f64>>,
    pub velocities: Vec<Option<Vec<f64>>>,
    pub fitness: Vec<f64>,
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
}

/// Records the whole population after each generation's evaluation, for
/// trajectory export and plotting
#[derive(Debug, Clone, Default)]
pub struct TrajectoryRecorder {
    frames: Vec<TrajectoryFrame>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[TrajectoryFrame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<TrajectoryFrame> {
        self.frames
    }

    /// Path of a single agent across all recorded generations
    pub fn trajectory(&self, agent: usize) -> Vec<Vec<f64>> {
        self.frames
            .iter()
            .filter_map(|f| f.positions.get(agent).cloned())
            .collect()
    }
}

impl OptimizationCallback for TrajectoryRecorder {
    fn on_generation(&mut self, snapshot: &GenerationSnapshot<'_>) -> Result<(), String> {
        let best = snapshot.leaders.best();
        let agents = snapshot.population.agents();
        self.frames.push(TrajectoryFrame {
            generation: snapshot.record.generation,
            positions: agents.iter().map(|a| a.position.clone()).collect(),
            velocities: agents.iter().map(|a| a.velocity.clone()).collect(),
            fitness: agents.iter().map(|a| a.fitness).collect(),
            best_position: best.position.clone(),
            best_fitness: best.fitness,
        });
        Ok(())
    }
}

/// Thread-safe cooperative stop flag.
///
/// Clones share the flag; cancel from any thread and the run stops after the
/// generation in progress.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl OptimizationCallback for CancellationToken {
    fn on_generation(&mut self, _snapshot: &GenerationSnapshot<'_>) -> Result<(), String> {
        Ok(())
    }

    fn should_stop(&self) -> bool {
        self.is_cancelled()
    }
}

/// Both callbacks see every generation; either one can stop the run
impl<A, B> OptimizationCallback for (A, B)
where
    A: OptimizationCallback,
    B: OptimizationCallback,
{
    fn on_generation(&mut self, snapshot: &GenerationSnapshot<'_>) -> Result<(), String> {
        self.0.on_generation(snapshot)?;
        self.1.on_generation(snapshot)
    }

    fn should_stop(&self) -> bool {
        self.0.should_stop() || self.1.should_stop()
    }
}
