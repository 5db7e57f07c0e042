//! Underdamped belief dynamics via leapfrog integration.
//!
//! Beliefs carry momentum: the free energy acts as a potential, the
//! epistemic-inertia blocks act as the mass, and means evolve under a
//! kick-drift-kick leapfrog scheme. Momentum is attached to the means only;
//! covariances carry none and contribute nothing to the recorded kinetic
//! energy. Kicks use the Euclidean force so that kinetic plus potential
//! energy is conserved for a frozen mass; covariances instead relax along
//! the natural-gradient flow between kicks, with a geodesic momentum
//! correction that vanishes when covariances are static.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::info;

use doxa_data::{LeapfrogConfig, MultiAgentSystem};

use crate::error::{CoreError, Result};
use crate::fisher::natural_sigma_gradient;
use crate::free_energy::compute_total_free_energy;
use crate::gradients::compute_euclidean_gradients;
use crate::mass_matrix::{mu_mass_blocks, MassMatrixConfig};
use crate::retraction::{retract_spd_cholesky, DEFAULT_RETRACTION_EPS};
use crate::spd::safe_inv;

/// Energy snapshot taken after one leapfrog step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HamiltonianRecord {
    pub step: u64,
    /// Kinetic energy `p^T M^-1 p / 2` summed over agents
    pub kinetic: f64,
    /// Weighted free energy of the system
    pub potential: f64,
    pub total: f64,
}

/// Per-step energy trace of a leapfrog run.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HamiltonianHistory {
    records: Vec<HamiltonianRecord>,
}

impl HamiltonianHistory {
    #[must_use]
    pub fn records(&self) -> &[HamiltonianRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Largest deviation of total energy from its value at the first step.
    #[must_use]
    pub fn max_energy_drift(&self) -> Option<f64> {
        let first = self.records.first()?.total;
        Some(
            self.records
                .iter()
                .map(|r| (r.total - first).abs())
                .fold(0.0, f64::max),
        )
    }

    fn push(&mut self, record: HamiltonianRecord) {
        self.records.push(record);
    }
}

/// Leapfrog integrator over agent belief means, with per-agent mass blocks.
pub struct HamiltonianTrainer {
    system: MultiAgentSystem,
    config: LeapfrogConfig,
    mass_config: MassMatrixConfig,
    eps: f64,
    momenta: Vec<DVector<f64>>,
    /// Per-agent `(M, M^-1)` pairs; empty until the first step builds them
    mass: Vec<(DMatrix<f64>, DMatrix<f64>)>,
    step_count: u64,
}

impl HamiltonianTrainer {
    #[must_use]
    pub fn new(system: MultiAgentSystem, config: LeapfrogConfig) -> Self {
        Self::with_mass_config(system, config, MassMatrixConfig::default())
    }

    #[must_use]
    pub fn with_mass_config(
        system: MultiAgentSystem,
        config: LeapfrogConfig,
        mass_config: MassMatrixConfig,
    ) -> Self {
        let dim = system.belief_dim();
        let momenta = (0..system.n_agents())
            .map(|_| DVector::zeros(dim))
            .collect();
        Self {
            system,
            config,
            mass_config,
            eps: DEFAULT_RETRACTION_EPS,
            momenta,
            mass: Vec::new(),
            step_count: 0,
        }
    }

    #[must_use]
    pub fn system(&self) -> &MultiAgentSystem {
        &self.system
    }

    /// Releases the system.
    #[must_use]
    pub fn into_system(self) -> MultiAgentSystem {
        self.system
    }

    #[must_use]
    pub fn momenta(&self) -> &[DVector<f64>] {
        &self.momenta
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Overrides one agent's momentum, e.g. to inject an initial impulse.
    pub fn set_momentum(&mut self, agent: usize, momentum: DVector<f64>) -> Result<()> {
        if agent >= self.momenta.len() {
            return Err(CoreError::dimension(format!(
                "agent index {agent} out of range for {} agents",
                self.momenta.len()
            )));
        }
        if momentum.len() != self.system.belief_dim() {
            return Err(CoreError::dimension(format!(
                "momentum of dimension {} for belief dimension {}",
                momentum.len(),
                self.system.belief_dim()
            )));
        }
        self.momenta[agent] = momentum;
        Ok(())
    }

    fn rebuild_mass(&mut self) -> Result<()> {
        let blocks = mu_mass_blocks(&self.system, &self.mass_config)?;
        let mut mass = Vec::with_capacity(blocks.len());
        for block in blocks {
            let inv = safe_inv(&block)?;
            mass.push((block, inv));
        }
        self.mass = mass;
        Ok(())
    }

    /// Total kinetic energy of the current momenta.
    fn kinetic_energy(&self) -> f64 {
        self.momenta
            .iter()
            .zip(&self.mass)
            .map(|(p, (_, m_inv))| 0.5 * p.dot(&(m_inv * p)))
            .sum()
    }

    /// One kick-drift-kick leapfrog step. Returns the post-step energies.
    pub fn step(&mut self) -> Result<HamiltonianRecord> {
        if self.mass.is_empty() || self.config.refresh_mass {
            self.rebuild_mass()?;
        }
        let dt = self.config.dt;
        let half = 0.5 * dt;

        let gradients = compute_euclidean_gradients(&self.system)?;
        for (p, g) in self.momenta.iter_mut().zip(&gradients) {
            *p -= &g.mu * half;
        }

        let velocities: Vec<DVector<f64>> = self
            .momenta
            .iter()
            .zip(&self.mass)
            .map(|(p, (_, m_inv))| m_inv * p)
            .collect();

        for (i, agent) in self.system.agents_mut().iter_mut().enumerate() {
            agent.belief.mean += &velocities[i] * dt;

            if agent.lr_sigma > 0.0 {
                let flow = natural_sigma_gradient(&agent.belief.cov, &gradients[i].sigma);
                let proposed = &agent.belief.cov - flow * (dt * agent.lr_sigma);
                let updated =
                    retract_spd_cholesky(&proposed, self.eps).map_err(|e| CoreError::NotSpd {
                        agent: agent.id,
                        reason: e.to_string(),
                    })?;
                let delta = &updated - &agent.belief.cov;
                if delta.amax() > 0.0 {
                    // Geodesic coupling of the mean flow to the moving
                    // covariance: p += M * dSigma * Sigma_new^-1 * v.
                    let prec = safe_inv(&updated)?;
                    self.momenta[i] += &self.mass[i].0 * (&delta * (&prec * &velocities[i]));
                }
                agent.belief.cov = updated;
            }
        }

        let gradients = compute_euclidean_gradients(&self.system)?;
        for (p, g) in self.momenta.iter_mut().zip(&gradients) {
            *p -= &g.mu * half;
        }

        let potential = compute_total_free_energy(&self.system)?.total;
        let kinetic = self.kinetic_energy();
        let record = HamiltonianRecord {
            step: self.step_count,
            kinetic,
            potential,
            total: kinetic + potential,
        };
        self.step_count += 1;
        Ok(record)
    }

    /// Runs `n_steps` leapfrog steps and returns the energy trace.
    pub fn run(&mut self, n_steps: u64) -> Result<HamiltonianHistory> {
        let mut history = HamiltonianHistory::default();
        for _ in 0..n_steps {
            let record = self.step()?;
            if self.config.log_interval > 0 && record.step % self.config.log_interval == 0 {
                info!(
                    step = record.step,
                    kinetic = record.kinetic,
                    potential = record.potential,
                    total = record.total,
                    "leapfrog step"
                );
            }
            history.push(record);
        }
        Ok(history)
    }
}
