//! Best-known solution tracking
//!
//! Particle swarms keep one personal best per agent plus a global best.
//! Grey wolf packs keep a ranked alpha/beta/delta triple. Both only accept a
//! candidate whose fitness is finite and strictly below the incumbent, so ties
//! keep the earlier solution and NaN/infinite fitness never becomes a leader.
//! Every leader owns a copy of its position.

use serde::{Deserialize, Serialize};

/// A tracked best-known solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub position: Vec<f64>,
    pub fitness: f64,
}

impl Leader {
    pub fn new(position: Vec<f64>, fitness: f64) -> Self {
        Self { position, fitness }
    }

    /// "No known best": zero position, infinite fitness
    pub fn unset(dimension: usize) -> Self {
        Self::new(vec![0.0; dimension], f64::INFINITY)
    }

    pub fn is_set(&self) -> bool {
        self.fitness.is_finite()
    }

    #[inline]
    pub fn is_beaten_by(&self, fitness: f64) -> bool {
        fitness.is_finite() && fitness < self.fitness
    }

    fn replace(&mut self, position: &[f64], fitness: f64) {
        self.position.clear();
        self.position.extend_from_slice(position);
        self.fitness = fitness;
    }
}

/// Which personal/global bests a candidate replaced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Improvement {
    pub personal: bool,
    pub global: bool,
}

/// Personal and global bests of a particle swarm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmLeaders {
    personal: Vec<Leader>,
    global: Leader,
}

impl SwarmLeaders {
    /// Personal bests start at each agent's initial position with infinite fitness
    pub fn new<'a>(positions: impl IntoIterator<Item = &'a [f64]>, dimension: usize) -> Self {
        Self {
            personal: positions
                .into_iter()
                .map(|p| Leader::new(p.to_vec(), f64::INFINITY))
                .collect(),
            global: Leader::unset(dimension),
        }
    }

    pub fn update(&mut self, index: usize, position: &[f64], fitness: f64) -> Improvement {
        let mut improvement = Improvement::default();
        if let Some(personal) = self.personal.get_mut(index) {
            if personal.is_beaten_by(fitness) {
                personal.replace(position, fitness);
                improvement.personal = true;
            }
        }
        if self.global.is_beaten_by(fitness) {
            self.global.replace(position, fitness);
            improvement.global = true;
        }
        improvement
    }

    pub fn global(&self) -> &Leader {
        &self.global
    }

    pub fn personal(&self, index: usize) -> Option<&Leader> {
        self.personal.get(index)
    }

    pub fn personal_bests(&self) -> &[Leader] {
        &self.personal
    }
}

/// Slot in the grey wolf hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    Alpha,
    Beta,
    Delta,
}

impl Rank {
    fn from_slot(slot: usize) -> Self {
        match slot {
            0 => Self::Alpha,
            1 => Self::Beta,
            _ => Self::Delta,
        }
    }
}

/// Ranked alpha/beta/delta triple, kept sorted by fitness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackLeaders {
    ranks: [Leader; 3],
}

impl PackLeaders {
    pub fn new(dimension: usize) -> Self {
        Self {
            ranks: [
                Leader::unset(dimension),
                Leader::unset(dimension),
                Leader::unset(dimension),
            ],
        }
    }

    /// Sorted insert of a candidate.
    ///
    /// The candidate takes the first slot whose incumbent it strictly beats and
    /// every lower-ranked leader shifts down one slot; the old delta drops out.
    /// Returns the slot taken, or `None` if the candidate ranks below delta.
    pub fn update(&mut self, position: &[f64], fitness: f64) -> Option<Rank> {
        let slot = self.ranks.iter().position(|l| l.is_beaten_by(fitness))?;
        self.ranks[slot..].rotate_right(1);
        self.ranks[slot].replace(position, fitness);
        Some(Rank::from_slot(slot))
    }

    pub fn get(&self, rank: Rank) -> &Leader {
        match rank {
            Rank::Alpha => &self.ranks[0],
            Rank::Beta => &self.ranks[1],
            Rank::Delta => &self.ranks[2],
        }
    }

    pub fn alpha(&self) -> &Leader {
        &self.ranks[0]
    }

    pub fn beta(&self) -> &Leader {
        &self.ranks[1]
    }

    pub fn delta(&self) -> &Leader {
        &self.ranks[2]
    }

    pub fn fitnesses(&self) -> [f64; 3] {
        [self.ranks[0].fitness, self.ranks[1].fitness, self.ranks[2].fitness]
    }
}

/// Copy of the leader state handed to callbacks and results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LeaderSnapshot {
    Global { best: Leader },
    Pack { alpha: Leader, beta: Leader, delta: Leader },
}

impl LeaderSnapshot {
    pub fn best(&self) -> &Leader {
        match self {
            Self::Global { best } => best,
            Self::Pack { alpha, .. } => alpha,
        }
    }
}
