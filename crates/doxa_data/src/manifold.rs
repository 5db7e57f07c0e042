//! Base conceptual manifold and per-agent support regions.
//!
//! The base manifold describes the coordinate space agents hold opinions
//! over; a support region marks, per agent, which of those coordinates the
//! agent actually has beliefs about. Both are immutable after construction
//! and shared read-only by all agents.

use serde::{Deserialize, Serialize};

/// Topology of the conceptual coordinate space.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopologyType {
    /// Flat Euclidean coordinates
    #[default]
    Euclidean,
    /// Periodic coordinates (opinions that wrap, e.g. cyclic preference spaces)
    Toroidal,
}

/// The conceptual coordinate space beliefs are defined over.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BaseManifold {
    n_coords: usize,
    topology: TopologyType,
}

impl BaseManifold {
    pub fn new(n_coords: usize, topology: TopologyType) -> anyhow::Result<Self> {
        anyhow::ensure!(n_coords > 0, "Base manifold must have at least one coordinate");
        Ok(Self { n_coords, topology })
    }

    #[must_use]
    pub fn n_coords(&self) -> usize {
        self.n_coords
    }

    #[must_use]
    pub fn topology(&self) -> TopologyType {
        self.topology
    }
}

/// Boolean mask over the base manifold's coordinates marking where an agent
/// holds opinions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SupportRegion {
    mask: Vec<bool>,
}

impl SupportRegion {
    pub fn new(mask: Vec<bool>) -> anyhow::Result<Self> {
        anyhow::ensure!(!mask.is_empty(), "Support mask must be non-empty");
        Ok(Self { mask })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Whether the agent holds an opinion on coordinate `idx`.
    #[must_use]
    pub fn is_active(&self, idx: usize) -> bool {
        self.mask.get(idx).copied().unwrap_or(false)
    }

    /// Number of active coordinates.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.mask.iter().filter(|&&b| b).count()
    }

    /// Coordinates active in both regions.
    #[must_use]
    pub fn intersection(&self, other: &SupportRegion) -> Vec<usize> {
        self.mask
            .iter()
            .zip(other.mask.iter())
            .enumerate()
            .filter_map(|(i, (&a, &b))| (a && b).then_some(i))
            .collect()
    }
}

/// Support covering every coordinate of the manifold.
#[must_use]
pub fn create_full_support(manifold: &BaseManifold) -> SupportRegion {
    SupportRegion {
        mask: vec![true; manifold.n_coords()],
    }
}
