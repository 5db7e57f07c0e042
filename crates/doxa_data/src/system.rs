//! The multi-agent system: agents, connectivity, and coupling configuration.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::config::SystemConfig;
use crate::manifold::{BaseManifold, TopologyType};

/// Which agents influence which. Row i marks the neighbors agent i attends to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Connectivity {
    n: usize,
    edges: Vec<bool>,
}

impl Connectivity {
    /// Fully connected: every agent attends to every other agent.
    #[must_use]
    pub fn full(n: usize) -> Self {
        let mut edges = vec![true; n * n];
        for i in 0..n {
            edges[i * n + i] = false;
        }
        Self { n, edges }
    }

    /// No social coupling at all.
    #[must_use]
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            edges: vec![false; n * n],
        }
    }

    /// Builds from an explicit edge list of `(from, to)` pairs.
    pub fn from_edges(n: usize, pairs: &[(usize, usize)]) -> anyhow::Result<Self> {
        let mut conn = Self::empty(n);
        for &(i, j) in pairs {
            anyhow::ensure!(i < n && j < n, "Edge ({i}, {j}) out of range for {n} agents");
            anyhow::ensure!(i != j, "Self-edges are not allowed (agent {i})");
            conn.edges[i * n + j] = true;
        }
        Ok(conn)
    }

    #[must_use]
    pub fn n_agents(&self) -> usize {
        self.n
    }

    /// Whether agent `i` attends to agent `j`.
    #[must_use]
    pub fn is_connected(&self, i: usize, j: usize) -> bool {
        i != j && i < self.n && j < self.n && self.edges[i * self.n + j]
    }

    /// Neighbors agent `i` attends to, in index order.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.n).filter(move |&j| self.is_connected(i, j))
    }
}

/// The unit of mutation per simulation step.
///
/// Owns the ordered agent collection, the coupling structure, and the system
/// configuration. A step in `doxa_core` reads the whole system snapshot,
/// computes one consistent gradient field, and commits all updates
/// synchronously; agents are never mutated one-by-one mid-step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MultiAgentSystem {
    manifold: BaseManifold,
    agents: Vec<Agent>,
    connectivity: Connectivity,
    config: SystemConfig,
}

impl MultiAgentSystem {
    /// Builds a system, validating every cross-agent consistency rule at
    /// construction time.
    ///
    /// Every agent's support must cover the whole manifold: the engine
    /// compares beliefs over all coordinates, so a partial mask is rejected
    /// here rather than silently ignored.
    pub fn new(
        manifold: BaseManifold,
        agents: Vec<Agent>,
        connectivity: Connectivity,
        config: SystemConfig,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(!agents.is_empty(), "System must contain at least one agent");
        config.validate()?;
        anyhow::ensure!(
            connectivity.n_agents() == agents.len(),
            "Connectivity is sized for {} agents but {} were supplied",
            connectivity.n_agents(),
            agents.len()
        );

        let k = manifold.n_coords();
        for agent in &agents {
            anyhow::ensure!(
                agent.dim() == k,
                "Agent {} has belief dimension {} but the manifold has {} coordinates",
                agent.id,
                agent.dim(),
                k
            );
            anyhow::ensure!(
                agent.frame.dim() == k,
                "Agent {} has a gauge frame of dimension {}",
                agent.id,
                agent.frame.dim()
            );
            anyhow::ensure!(
                agent.support.len() == k,
                "Agent {} has a support mask of length {}",
                agent.id,
                agent.support.len()
            );
            anyhow::ensure!(
                agent.support.active_count() == k,
                "Agent {} has a partial support mask; masked belief coordinates are not supported",
                agent.id
            );
            if let Some(obs) = &agent.observation {
                anyhow::ensure!(
                    obs.dim() == k,
                    "Agent {} has an observation of dimension {}",
                    agent.id,
                    obs.dim()
                );
            }
        }
        Ok(Self {
            manifold,
            agents,
            connectivity,
            config,
        })
    }

    /// Fully connected system over a flat manifold inferred from the agents.
    pub fn fully_connected(agents: Vec<Agent>, config: SystemConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(!agents.is_empty(), "System must contain at least one agent");
        let k = agents[0].dim();
        let manifold = BaseManifold::new(k, TopologyType::Euclidean)?;
        let connectivity = Connectivity::full(agents.len());
        Self::new(manifold, agents, connectivity, config)
    }

    #[must_use]
    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }

    /// Belief dimension shared by all agents.
    #[must_use]
    pub fn belief_dim(&self) -> usize {
        self.manifold.n_coords()
    }

    #[must_use]
    pub fn manifold(&self) -> &BaseManifold {
        &self.manifold
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable agent access for the engine's commit phase.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    #[must_use]
    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    #[must_use]
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
