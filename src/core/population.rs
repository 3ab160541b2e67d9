use super::space::BoundedSpace;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single candidate solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub position: Vec<f64>,
    /// Only particle swarms carry a velocity
    pub velocity: Option<Vec<f64>>,
    /// Fitness of `position` as of the last evaluation (lower is better)
    pub fitness: f64,
}

impl Agent {
    /// Unevaluated agent at `position`
    pub fn new(position: Vec<f64>) -> Self {
        Self {
            position,
            velocity: None,
            fitness: f64::INFINITY,
        }
    }

    pub fn dimension(&self) -> usize {
        self.position.len()
    }
}

/// Orders fitness values so that non-finite values sort after every finite one
pub(crate) fn fitness_order(a: f64, b: f64) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Fixed-size, index-stable collection of agents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn get(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Agent> {
        self.agents.iter_mut()
    }

    pub fn positions(&self) -> Vec<Vec<f64>> {
        self.agents.iter().map(|a| a.position.clone()).collect()
    }

    pub fn clamp_all(&mut self, space: &BoundedSpace) {
        for agent in &mut self.agents {
            space.clamp(&mut agent.position);
        }
    }

    pub fn all_within(&self, space: &BoundedSpace) -> bool {
        self.agents.iter().all(|a| space.contains(&a.position))
    }

    /// Agent indices sorted best-first; ties keep index order
    pub fn ranked_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.agents.len()).collect();
        indices.sort_by(|&a, &b| fitness_order(self.agents[a].fitness, self.agents[b].fitness));
        indices
    }

    /// Index of the best agent with a finite fitness, earliest on ties
    pub fn best_index(&self) -> Option<usize> {
        self.ranked_indices()
            .first()
            .copied()
            .filter(|&i| self.agents[i].fitness.is_finite())
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}
