//! The natural gradient engine.
//!
//! Differentiates the free-energy functional with respect to each agent's
//! `(mu_q, Sigma_q)` in closed form, then rescales by the inverse Fisher
//! metric at that agent's belief point. Attention weights are held constant
//! within a step (the step is a pure function of the system snapshot), so
//! the KL gradients below are exact for the frozen weights.
//!
//! The scatter over agents is read-only and embarrassingly parallel; the
//! commit happens later, in the update engine, after every gradient has been
//! computed.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use doxa_data::MultiAgentSystem;

use crate::attention::{attention_weights, KlMode};
use crate::error::Result;
use crate::fisher::{natural_mu_gradient, natural_sigma_gradient};
use crate::spd::{safe_inv, symmetrize};
use crate::transport::transport_operator;

/// Step-scoped gradient of the total free energy for one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentGradients {
    /// Gradient with respect to the belief mean
    pub mu: DVector<f64>,
    /// Gradient with respect to the belief covariance
    pub sigma: DMatrix<f64>,
}

/// Euclidean (raw) gradients of the weighted free energy, one per agent.
pub fn compute_euclidean_gradients(system: &MultiAgentSystem) -> Result<Vec<AgentGradients>> {
    let n = system.n_agents();
    let agents = system.agents();
    let config = *system.config();

    let beta_belief = attention_weights(system, KlMode::Belief)?;
    let beta_prior = attention_weights(system, KlMode::Prior)?;

    let belief_precisions: Vec<DMatrix<f64>> = agents
        .iter()
        .map(|a| safe_inv(&a.belief.cov))
        .collect::<Result<_>>()?;
    let prior_precisions: Vec<DMatrix<f64>> = agents
        .iter()
        .map(|a| safe_inv(&a.prior.cov))
        .collect::<Result<_>>()?;

    (0..n)
        .into_par_iter()
        .map(|i| {
            let agent = &agents[i];
            let mu_i = &agent.belief.mean;
            let prec_q = &belief_precisions[i];

            let mut grad_mu = &prior_precisions[i] * (mu_i - &agent.prior.mean) * config.lambda_self;
            let mut grad_sigma =
                (&prior_precisions[i] - prec_q) * (0.5 * config.lambda_self);

            for j in system.connectivity().neighbors(i) {
                let op = transport_operator(&agents[j].frame, &agent.frame)?;

                let wb = config.lambda_belief_align * beta_belief[(i, j)];
                if wb != 0.0 {
                    let mean_t = &op * &agents[j].belief.mean;
                    // inv(T S T^T) = T inv(S) T^T for orthogonal T
                    let prec_t = symmetrize(&(&op * &belief_precisions[j] * op.transpose()));
                    grad_mu += &prec_t * (mu_i - &mean_t) * wb;
                    grad_sigma += (&prec_t - prec_q) * (0.5 * wb);
                }

                let wp = config.lambda_prior_align * beta_prior[(i, j)];
                if wp != 0.0 {
                    let mean_t = &op * &agents[j].prior.mean;
                    let prec_t = symmetrize(&(&op * &prior_precisions[j] * op.transpose()));
                    grad_mu += &prec_t * (mu_i - &mean_t) * wp;
                    grad_sigma += (&prec_t - prec_q) * (0.5 * wp);
                }
            }

            if let Some(obs) = &agent.observation {
                let prec_o = safe_inv(&obs.cov)?;
                grad_mu += &prec_o * (mu_i - &obs.mean);
                grad_sigma += (&prec_o - prec_q) * 0.5;
            }

            Ok(AgentGradients {
                mu: grad_mu,
                sigma: symmetrize(&grad_sigma),
            })
        })
        .collect()
}

/// Natural gradients: the Euclidean gradients rescaled by the inverse Fisher
/// metric at each agent's belief point.
///
/// Steps taken along these are invariant to reparameterization of the belief
/// coordinates and proportional to information content, not raw magnitude.
pub fn compute_natural_gradients(system: &MultiAgentSystem) -> Result<Vec<AgentGradients>> {
    let euclidean = compute_euclidean_gradients(system)?;
    Ok(system
        .agents()
        .iter()
        .zip(euclidean)
        .map(|(agent, grad)| AgentGradients {
            mu: natural_mu_gradient(&agent.belief.cov, &grad.mu),
            sigma: natural_sigma_gradient(&agent.belief.cov, &grad.sigma),
        })
        .collect())
}
