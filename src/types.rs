use crate::optimization::leaders::LeaderSnapshot;
use serde::{Deserialize, Serialize};

/// Lifecycle of an optimization run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunStatus {
    /// Population drawn, leaders reset, nothing evaluated yet
    Initialized,
    /// `generation` generations have completed
    Running { generation: usize },
    /// Target fitness reached or progress stagnated
    Converged { generation: usize },
    BudgetExhausted { generation: usize },
    /// Stopped on request between generations
    Cancelled { generation: usize },
    /// Objective or callback failure
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Initialized | Self::Running { .. })
    }

    /// Number of completed generations, when known
    pub fn generation(&self) -> Option<usize> {
        match *self {
            Self::Running { generation }
            | Self::Converged { generation }
            | Self::BudgetExhausted { generation }
            | Self::Cancelled { generation } => Some(generation),
            Self::Initialized | Self::Failed => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Initialized => "Initialized",
            Self::Running { .. } => "Running",
            Self::Converged { .. } => "Converged",
            Self::BudgetExhausted { .. } => "Max generations reached",
            Self::Cancelled { .. } => "Stopped by callback",
            Self::Failed => "Failed",
        }
    }
}

/// Per-generation entry of the convergence history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// 1-based; 0 is the evaluation-only pass of a zero-generation budget
    pub generation: usize,
    /// Best fitness known after this generation's leader update
    pub best_fitness: f64,
    /// Best finite fitness among this generation's agents (infinite if none)
    pub generation_best: f64,
    /// Agents whose fitness was NaN or infinite
    pub anomalies: usize,
    /// Objective evaluations so far
    pub evaluations: usize,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub status: RunStatus,
    pub strategy: String,
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
    /// Full leader state (alpha/beta/delta for grey wolf runs)
    pub leaders: LeaderSnapshot,
    pub evaluations: usize,
    pub history: Vec<GenerationRecord>,
}

impl OptimizationResult {
    pub fn success(&self) -> bool {
        self.best_fitness.is_finite() && !matches!(self.status, RunStatus::Failed)
    }

    pub fn generations(&self) -> usize {
        self.status.generation().unwrap_or(self.history.len())
    }

    /// `(generation, best_fitness)` pairs; restartable
    pub fn history(&self) -> impl Iterator<Item = (usize, f64)> + Clone + '_ {
        self.history.iter().map(|r| (r.generation, r.best_fitness))
    }

    /// Total NaN/infinite evaluations across the run
    pub fn anomalies(&self) -> usize {
        self.history.iter().map(|r| r.anomalies).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::leaders::Leader;

    fn result() -> OptimizationResult {
        OptimizationResult {
            status: RunStatus::BudgetExhausted { generation: 2 },
            strategy: "PSO".into(),
            best_position: vec![0.5],
            best_fitness: 0.25,
            leaders: LeaderSnapshot::Global {
                best: Leader::new(vec![0.5], 0.25),
            },
            evaluations: 4,
            history: vec![
                GenerationRecord {
                    generation: 1,
                    best_fitness: 1.0,
                    generation_best: 1.0,
                    anomalies: 1,
                    evaluations: 2,
                },
                GenerationRecord {
                    generation: 2,
                    best_fitness: 0.25,
                    generation_best: 0.25,
                    anomalies: 0,
                    evaluations: 4,
                },
            ],
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(!RunStatus::Initialized.is_terminal());
        assert!(!RunStatus::Running { generation: 3 }.is_terminal());
        assert!(RunStatus::Converged { generation: 3 }.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert_eq!(RunStatus::Cancelled { generation: 4 }.generation(), Some(4));
    }

    #[test]
    fn test_history_is_restartable() {
        let r = result();
        let first: Vec<_> = r.history().collect();
        let second: Vec<_> = r.history().collect();
        assert_eq!(first, vec![(1, 1.0), (2, 0.25)]);
        assert_eq!(first, second);
        assert_eq!(r.anomalies(), 1);
        assert_eq!(r.generations(), 2);
        assert!(r.success());
    }

    #[test]
    fn test_result_json() {
        let json = result().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"]["state"], "budget_exhausted");
        assert_eq!(value["leaders"]["kind"], "global");
        assert_eq!(value["history"][1]["best_fitness"], 0.25);
    }
}
