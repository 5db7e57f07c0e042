//! The variational free-energy functional.
//!
//! Total energy decomposes into four non-negative terms:
//!
//! - self energy: KL between each agent's belief and its own prior
//! - belief alignment: attention-weighted KL to neighbors' beliefs
//! - prior alignment: attention-weighted KL to neighbors' priors
//! - observation: KL to externally supplied evidence, when present
//!
//! All cross-agent comparisons happen in the observing agent's gauge frame
//! via parallel transport. This functional is the single source of truth the
//! gradient engine differentiates.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use doxa_data::MultiAgentSystem;

use crate::attention::{attention_weights, KlMode};
use crate::error::Result;
use crate::fisher::kl_gaussian;
use crate::transport::{transport_gaussian, transport_operator};

/// Per-step decomposition of the system free energy.
///
/// The four term fields are raw (unweighted) energy sums; `total` applies the
/// system's coupling weights: `lambda_self * self_energy + lambda_belief *
/// belief_align + lambda_prior * prior_align + observation`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct FreeEnergyBreakdown {
    pub self_energy: f64,
    pub belief_align: f64,
    pub prior_align: f64,
    pub observation: f64,
    pub total: f64,
}

/// Sum over agents of `KL(q_i || p_i)`.
pub fn compute_self_energy(system: &MultiAgentSystem) -> Result<f64> {
    let mut energy = 0.0;
    for agent in system.agents() {
        energy += kl_gaussian(&agent.belief, &agent.prior)?;
    }
    Ok(energy)
}

/// Attention-weighted sum of belief-vs-belief KL across connected pairs.
pub fn compute_belief_alignment_energy(
    system: &MultiAgentSystem,
    beta: &DMatrix<f64>,
) -> Result<f64> {
    alignment_energy(system, beta, KlMode::Belief)
}

/// Attention-weighted sum of belief-vs-neighbor-prior KL across connected
/// pairs; ideological rather than momentary influence.
pub fn compute_prior_alignment_energy(
    system: &MultiAgentSystem,
    beta: &DMatrix<f64>,
) -> Result<f64> {
    alignment_energy(system, beta, KlMode::Prior)
}

fn alignment_energy(
    system: &MultiAgentSystem,
    beta: &DMatrix<f64>,
    mode: KlMode,
) -> Result<f64> {
    let agents = system.agents();
    let mut energy = 0.0;
    for i in 0..system.n_agents() {
        for j in system.connectivity().neighbors(i) {
            let weight = beta[(i, j)];
            if weight == 0.0 {
                continue;
            }
            let source = match mode {
                KlMode::Belief => &agents[j].belief,
                KlMode::Prior => &agents[j].prior,
            };
            let op = transport_operator(&agents[j].frame, &agents[i].frame)?;
            let transported = transport_gaussian(source, &op)?;
            energy += weight * kl_gaussian(&agents[i].belief, &transported)?;
        }
    }
    Ok(energy)
}

/// Sum over agents of `KL(q_i || o_i)` for agents carrying an observation.
pub fn compute_observation_energy(system: &MultiAgentSystem) -> Result<f64> {
    let mut energy = 0.0;
    for agent in system.agents() {
        if let Some(obs) = &agent.observation {
            energy += kl_gaussian(&agent.belief, obs)?;
        }
    }
    Ok(energy)
}

/// Evaluates the full functional and its four-term breakdown.
pub fn compute_total_free_energy(system: &MultiAgentSystem) -> Result<FreeEnergyBreakdown> {
    let config = system.config();
    let beta_belief = attention_weights(system, KlMode::Belief)?;
    let beta_prior = attention_weights(system, KlMode::Prior)?;

    let self_energy = compute_self_energy(system)?;
    let belief_align = compute_belief_alignment_energy(system, &beta_belief)?;
    let prior_align = compute_prior_alignment_energy(system, &beta_prior)?;
    let observation = compute_observation_energy(system)?;

    let total = config.lambda_self * self_energy
        + config.lambda_belief_align * belief_align
        + config.lambda_prior_align * prior_align
        + observation;

    Ok(FreeEnergyBreakdown {
        self_energy,
        belief_align,
        prior_align,
        observation,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxa_data::{Agent, Gaussian, SystemConfig};
    use nalgebra::{DMatrix, DVector};

    fn agent_at(id: usize, x: f64) -> Agent {
        let belief = Gaussian::new(
            DVector::from_vec(vec![x, 0.0]),
            DMatrix::identity(2, 2),
        )
        .unwrap();
        let prior = Gaussian::isotropic(2, 1.0).unwrap();
        Agent::new(id, belief, prior).unwrap()
    }

    fn two_agent_system(x0: f64, x1: f64) -> MultiAgentSystem {
        MultiAgentSystem::fully_connected(
            vec![agent_at(0, x0), agent_at(1, x1)],
            SystemConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_all_terms_non_negative() {
        let system = two_agent_system(1.5, -0.5);
        let breakdown = compute_total_free_energy(&system).unwrap();
        assert!(breakdown.self_energy >= 0.0);
        assert!(breakdown.belief_align >= 0.0);
        assert!(breakdown.prior_align >= 0.0);
        assert!(breakdown.observation >= 0.0);
        assert!(breakdown.total >= 0.0);
    }

    #[test]
    fn test_identical_system_has_zero_energy() {
        // Beliefs equal to priors and to each other: every KL vanishes.
        let system = two_agent_system(0.0, 0.0);
        let breakdown = compute_total_free_energy(&system).unwrap();
        assert!(breakdown.total < 1e-12);
    }

    #[test]
    fn test_observation_energy_zero_without_observations() {
        let system = two_agent_system(1.0, 2.0);
        assert_eq!(compute_observation_energy(&system).unwrap(), 0.0);
    }

    #[test]
    fn test_observation_energy_counts_attached_evidence() {
        let mut agents = vec![agent_at(0, 1.0), agent_at(1, 2.0)];
        agents[0].observation = Some(Gaussian::isotropic(2, 1.0).unwrap());
        let system =
            MultiAgentSystem::fully_connected(agents, SystemConfig::default()).unwrap();
        // Agent 0's belief sits at x = 1 but the evidence is centered at 0.
        assert!(compute_observation_energy(&system).unwrap() > 0.4);
    }

    #[test]
    fn test_total_applies_weights() {
        let agents = vec![agent_at(0, 1.0), agent_at(1, -1.0)];
        let config = SystemConfig {
            lambda_self: 0.0,
            lambda_belief_align: 0.0,
            lambda_prior_align: 0.0,
            kappa_beta: 1.0,
        };
        let system = MultiAgentSystem::fully_connected(agents, config).unwrap();
        let breakdown = compute_total_free_energy(&system).unwrap();
        assert!(breakdown.self_energy > 0.0);
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn test_breakdown_serializes() {
        let system = two_agent_system(0.5, -0.5);
        let breakdown = compute_total_free_energy(&system).unwrap();
        let json = serde_json::to_string(&breakdown).unwrap();
        let back: FreeEnergyBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(breakdown, back);
    }
}
