//! Epistemic inertia: the mass matrix.
//!
//! Each agent's resistance to belief change is a K x K SPD block combining
//! prior precision, observation precision, and attention-weighted neighbor
//! precision. Strong priors, confident evidence, and influential social
//! connections all make an agent harder to move.
//!
//! The block-diagonal variant is the mass used by the Hamiltonian trainer;
//! the full variant additionally couples agents through a matrix-weighted
//! graph Laplacian in the global gauge frame, which keeps the whole matrix
//! SPD (Laplacian PSD + SPD diagonal + regularizer).

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use doxa_data::MultiAgentSystem;

use crate::attention::compute_social_influence_matrix;
use crate::error::Result;
use crate::spd::{safe_inv, symmetrize};

/// Parameters for mass-matrix construction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MassMatrixConfig {
    /// Regularizer added to every diagonal block
    pub epsilon: f64,
    /// Scale of the social-coupling contribution
    pub social_weight: f64,
    /// Whether observation precision contributes to inertia
    pub include_observations: bool,
}

impl Default for MassMatrixConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            social_weight: 1.0,
            include_observations: true,
        }
    }
}

/// Block-diagonal mass matrix over the stacked agent means (NK x NK).
///
/// Block `i` is `Sigma_p_i^-1 + Sigma_obs_i^-1 + social_weight *
/// sum_j beta_ij T_ij Sigma_q_j^-1 T_ij^T + epsilon I`, each neighbor
/// precision transported into agent i's frame.
pub fn build_mu_mass_matrix(
    system: &MultiAgentSystem,
    config: &MassMatrixConfig,
) -> Result<DMatrix<f64>> {
    let n = system.n_agents();
    let k = system.belief_dim();
    let blocks = mu_mass_blocks(system, config)?;
    let mut mass = DMatrix::zeros(n * k, n * k);
    for (i, block) in blocks.iter().enumerate() {
        for a in 0..k {
            for b in 0..k {
                mass[(i * k + a, i * k + b)] = block[(a, b)];
            }
        }
    }
    Ok(mass)
}

/// The per-agent K x K inertia blocks of [`build_mu_mass_matrix`].
pub fn mu_mass_blocks(
    system: &MultiAgentSystem,
    config: &MassMatrixConfig,
) -> Result<Vec<DMatrix<f64>>> {
    let k = system.belief_dim();
    let agents = system.agents();
    let beta = compute_social_influence_matrix(system)?;

    let belief_precisions: Vec<DMatrix<f64>> = agents
        .iter()
        .map(|a| safe_inv(&a.belief.cov))
        .collect::<Result<_>>()?;

    let mut blocks = Vec::with_capacity(agents.len());
    for (i, agent) in agents.iter().enumerate() {
        let mut block = safe_inv(&agent.prior.cov)?;
        if config.include_observations {
            if let Some(obs) = &agent.observation {
                block += safe_inv(&obs.cov)?;
            }
        }
        for j in system.connectivity().neighbors(i) {
            let weight = config.social_weight * beta[(i, j)];
            if weight == 0.0 {
                continue;
            }
            let op = crate::transport::transport_operator(&agents[j].frame, &agent.frame)?;
            block += symmetrize(&(&op * &belief_precisions[j] * op.transpose())) * weight;
        }
        for d in 0..k {
            block[(d, d)] += config.epsilon;
        }
        blocks.push(symmetrize(&block));
    }
    Ok(blocks)
}

/// Full mass matrix with social off-diagonal coupling, in the global frame.
///
/// Diagonal blocks carry each agent's prior (and observation) precision
/// rotated into global coordinates plus the regularizer; every connected
/// pair contributes a Laplacian term with edge weight
/// `(beta_ij + beta_ji) / 2 * social_weight * (G_i + G_j) / 2`, where `G` is
/// the agent's belief precision in the global frame.
pub fn build_full_mass_matrix(
    system: &MultiAgentSystem,
    config: &MassMatrixConfig,
) -> Result<DMatrix<f64>> {
    let n = system.n_agents();
    let k = system.belief_dim();
    let agents = system.agents();
    let beta = compute_social_influence_matrix(system)?;

    let global_belief_precisions: Vec<DMatrix<f64>> = agents
        .iter()
        .map(|a| {
            let prec = safe_inv(&a.belief.cov)?;
            let r = a.frame.rotation();
            Ok(symmetrize(&(r * prec * r.transpose())))
        })
        .collect::<Result<_>>()?;

    let mut mass = DMatrix::zeros(n * k, n * k);
    let add_block = |m: &mut DMatrix<f64>, bi: usize, bj: usize, w: &DMatrix<f64>, sign: f64| {
        for a in 0..k {
            for b in 0..k {
                m[(bi * k + a, bj * k + b)] += sign * w[(a, b)];
            }
        }
    };

    for (i, agent) in agents.iter().enumerate() {
        let r = agent.frame.rotation();
        let mut diag = symmetrize(&(r * safe_inv(&agent.prior.cov)? * r.transpose()));
        if config.include_observations {
            if let Some(obs) = &agent.observation {
                diag += symmetrize(&(r * safe_inv(&obs.cov)? * r.transpose()));
            }
        }
        for d in 0..k {
            diag[(d, d)] += config.epsilon;
        }
        add_block(&mut mass, i, i, &diag, 1.0);
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let forward = system.connectivity().is_connected(i, j);
            let backward = system.connectivity().is_connected(j, i);
            if !forward && !backward {
                continue;
            }
            let b_ij = if forward { beta[(i, j)] } else { 0.0 };
            let b_ji = if backward { beta[(j, i)] } else { 0.0 };
            let weight = 0.5 * (b_ij + b_ji) * config.social_weight;
            if weight == 0.0 {
                continue;
            }
            let edge = (&global_belief_precisions[i] + &global_belief_precisions[j]) * (0.5 * weight);
            add_block(&mut mass, i, i, &edge, 1.0);
            add_block(&mut mass, j, j, &edge, 1.0);
            add_block(&mut mass, i, j, &edge, -1.0);
            add_block(&mut mass, j, i, &edge, -1.0);
        }
    }
    Ok(mass)
}

/// Scalar inertia per agent: the average eigenvalue (trace / K) of each
/// agent's mass block.
pub fn compute_epistemic_inertia(
    system: &MultiAgentSystem,
    config: &MassMatrixConfig,
) -> Result<Vec<f64>> {
    let k = system.belief_dim() as f64;
    Ok(mu_mass_blocks(system, config)?
        .iter()
        .map(|block| block.trace() / k)
        .collect())
}
