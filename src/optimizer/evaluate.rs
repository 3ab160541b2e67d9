use crate::core::Population;
use crate::error::{OptimizeError, OptimizeResult};
use crate::optimization::problem::Objective;
use argmin::core::CostFunction;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Thread pool for one run's evaluations
pub(crate) fn build_pool(workers: Option<usize>) -> OptimizeResult<ThreadPool> {
    let threads = workers.unwrap_or_else(num_cpus::get).max(1);
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| OptimizeError::ThreadPool(e.to_string()))
}

/// Evaluate every agent's current position and store the fitness.
///
/// All evaluations finish before any fitness is written, and results are
/// written in index order, so a parallel pass is indistinguishable from a
/// sequential one. The first failing agent (by index) fails the whole pass.
pub(crate) fn evaluate_population<O: Objective>(
    population: &mut Population,
    objective: &O,
    pool: Option<&ThreadPool>,
    generation: usize,
) -> OptimizeResult<()> {
    let results: Vec<Result<f64, argmin::core::Error>> = match pool {
        Some(pool) => pool.install(|| {
            population
                .agents()
                .par_iter()
                .map(|agent| objective.cost(&agent.position))
                .collect()
        }),
        None => population
            .iter()
            .map(|agent| objective.cost(&agent.position))
            .collect(),
    };

    let fitness = results
        .into_iter()
        .enumerate()
        .map(|(agent, result)| {
            result.map_err(|e| OptimizeError::ObjectiveEvaluation {
                agent,
                generation,
                message: format!("{e:#}"),
            })
        })
        .collect::<OptimizeResult<Vec<f64>>>()?;

    for (agent, f) in population.iter_mut().zip(fitness) {
        agent.fitness = f;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Agent;
    use crate::optimization::problem::{FallibleProblem, Sphere};

    fn population() -> Population {
        Population::new((0..16).map(|i| Agent::new(vec![i as f64, -1.0])).collect())
    }

    #[test]
    fn test_sequential_evaluation() {
        let mut pop = population();
        evaluate_population(&mut pop, &Sphere, None, 1).unwrap();
        assert_eq!(pop.get(0).unwrap().fitness, 1.0);
        assert_eq!(pop.get(3).unwrap().fitness, 10.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pool = build_pool(Some(4)).unwrap();
        let mut seq = population();
        let mut par = population();
        evaluate_population(&mut seq, &Sphere, None, 1).unwrap();
        evaluate_population(&mut par, &Sphere, Some(&pool), 1).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_first_failure_reported() {
        let objective = FallibleProblem::new(|x: &[f64]| {
            if x[0] >= 5.0 {
                Err(argmin::core::Error::msg("out of domain"))
            } else {
                Ok(x[0])
            }
        });
        let pool = build_pool(Some(3)).unwrap();
        let mut pop = population();
        let err = evaluate_population(&mut pop, &objective, Some(&pool), 4).unwrap_err();
        match err {
            OptimizeError::ObjectiveEvaluation {
                agent,
                generation,
                message,
            } => {
                assert_eq!(agent, 5);
                assert_eq!(generation, 4);
                assert_eq!(message, "out of domain");
            }
            other => panic!("unexpected error {other:?}"),
        }
        // nothing written on failure
        assert!(pop.iter().all(|a| a.fitness.is_infinite()));
    }
}
