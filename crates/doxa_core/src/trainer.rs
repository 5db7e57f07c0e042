//! Overdamped natural-gradient descent.
//!
//! Each step evaluates the free-energy functional, computes natural gradients
//! from the same snapshot, and commits them through the retraction engine.
//! The trainer owns the system for the duration of a run; `into_system`
//! releases it afterwards.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use doxa_data::{MultiAgentSystem, TrainingConfig};

use crate::error::Result;
use crate::free_energy::{compute_total_free_energy, FreeEnergyBreakdown};
use crate::gradients::compute_natural_gradients;
use crate::retraction::GradientApplier;

/// Energy snapshot taken at the start of one training step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EnergyRecord {
    pub step: u64,
    pub breakdown: FreeEnergyBreakdown,
}

/// Per-step energy trace of a training run.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    records: Vec<EnergyRecord>,
}

impl TrainingHistory {
    #[must_use]
    pub fn records(&self) -> &[EnergyRecord] {
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

    /// Total energy at the last recorded step, if any step ran.
    #[must_use]
    pub fn final_energy(&self) -> Option<f64> {
        self.records.last().map(|r| r.breakdown.total)
    }

    fn push(&mut self, record: EnergyRecord) {
        self.records.push(record);
    }
}

/// Gradient-flow trainer: beliefs relax toward a free-energy minimum with no
/// momentum.
pub struct Trainer {
    system: MultiAgentSystem,
    applier: GradientApplier,
    config: TrainingConfig,
    step_count: u64,
}

impl Trainer {
    #[must_use]
    pub fn new(system: MultiAgentSystem, config: TrainingConfig) -> Self {
        Self {
            system,
            applier: GradientApplier::default(),
            config,
            step_count: 0,
        }
    }

    #[must_use]
    pub fn system(&self) -> &MultiAgentSystem {
        &self.system
    }

    /// Releases the trained system.
    #[must_use]
    pub fn into_system(self) -> MultiAgentSystem {
        self.system
    }

    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Runs one descent step and returns the pre-step energy breakdown.
    pub fn step(&mut self) -> Result<FreeEnergyBreakdown> {
        let breakdown = compute_total_free_energy(&self.system)?;
        let gradients = compute_natural_gradients(&self.system)?;
        self.applier.apply(&mut self.system, &gradients)?;
        self.step_count += 1;
        Ok(breakdown)
    }

    /// Runs up to `n_steps` steps, stopping early once the per-step energy
    /// decrease falls below the configured tolerance.
    pub fn train(&mut self, n_steps: u64) -> Result<TrainingHistory> {
        let mut history = TrainingHistory::default();
        let mut previous_total: Option<f64> = None;

        for _ in 0..n_steps {
            let step = self.step_count;
            let breakdown = self.step()?;
            history.push(EnergyRecord { step, breakdown });

            if self.config.log_interval > 0 && step % self.config.log_interval == 0 {
                info!(
                    step,
                    total = breakdown.total,
                    self_energy = breakdown.self_energy,
                    belief_align = breakdown.belief_align,
                    "training step"
                );
            }

            if let Some(prev) = previous_total {
                let decrease = prev - breakdown.total;
                if decrease.abs() < self.config.convergence_tol {
                    debug!(step, decrease, "converged, stopping early");
                    break;
                }
            }
            previous_total = Some(breakdown.total);
        }
        Ok(history)
    }
}
