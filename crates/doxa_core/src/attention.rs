//! Social softmax attention over pairwise KL divergences.
//!
//! `beta_ij = softmax_j(-KL_ij / kappa)`: closer neighbors (lower KL) get
//! more attention, scaled by the temperature `kappa`. Rows are normalized
//! over an agent's connected neighbors only - the diagonal is excluded, and
//! an agent with no neighbors gets an all-zero row rather than a degenerate
//! normalization.

use nalgebra::DMatrix;

use doxa_data::MultiAgentSystem;

use crate::error::{CoreError, Result};
use crate::fisher::kl_gaussian;
use crate::transport::{transport_gaussian, transport_operator};

/// Which distributions the pairwise KL matrix compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KlMode {
    /// Agent i's belief vs neighbor j's belief
    Belief,
    /// Agent i's belief vs neighbor j's prior
    Prior,
}

/// N x N matrix of pairwise KL divergences in each agent's own frame.
///
/// Entry `(i, j)` is `KL(q_i || T_{i<-j} x_j)` for connected `j != i`, where
/// `x_j` is neighbor j's belief or prior depending on `mode` and `T` the
/// gauge transport into agent i's frame. Unconnected pairs and the diagonal
/// are left at zero and never enter any normalization.
pub fn compute_kl_matrix(system: &MultiAgentSystem, mode: KlMode) -> Result<DMatrix<f64>> {
    let n = system.n_agents();
    let agents = system.agents();
    let mut kl = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            if !system.connectivity().is_connected(i, j) {
                continue;
            }
            let source = match mode {
                KlMode::Belief => &agents[j].belief,
                KlMode::Prior => &agents[j].prior,
            };
            let op = transport_operator(&agents[j].frame, &agents[i].frame)?;
            let transported = transport_gaussian(source, &op)?;
            kl[(i, j)] = kl_gaussian(&agents[i].belief, &transported)?;
        }
    }
    Ok(kl)
}

/// Row-stochastic softmax of `-kl / kappa` over each agent's neighbors.
///
/// Uses the standard max-subtraction trick for numerical stability. Rows of
/// agents with no neighbors are all zero.
pub fn compute_softmax_weights(
    kl: &DMatrix<f64>,
    system: &MultiAgentSystem,
    kappa: f64,
) -> Result<DMatrix<f64>> {
    if !kappa.is_finite() || kappa <= 0.0 {
        return Err(CoreError::InvalidTemperature(kappa));
    }
    let n = system.n_agents();
    if kl.nrows() != n || kl.ncols() != n {
        return Err(CoreError::dimension(format!(
            "KL matrix is {}x{} for a system of {} agents",
            kl.nrows(),
            kl.ncols(),
            n
        )));
    }

    let mut beta = DMatrix::zeros(n, n);
    for i in 0..n {
        let neighbors: Vec<usize> = system.connectivity().neighbors(i).collect();
        if neighbors.is_empty() {
            continue;
        }
        let logits: Vec<f64> = neighbors.iter().map(|&j| -kl[(i, j)] / kappa).collect();
        let max_logit = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !max_logit.is_finite() {
            return Err(CoreError::numeric(
                "softmax logits are not finite; upstream KL is degenerate",
            ));
        }
        let exps: Vec<f64> = logits.iter().map(|l| (l - max_logit).exp()).collect();
        let norm: f64 = exps.iter().sum();
        if norm <= 0.0 || !norm.is_finite() {
            return Err(CoreError::numeric("softmax normalizer is degenerate"));
        }
        for (&j, e) in neighbors.iter().zip(exps.iter()) {
            beta[(i, j)] = e / norm;
        }
    }
    Ok(beta)
}

/// The social influence matrix `beta` from belief-vs-belief KL, at the
/// system's configured temperature.
pub fn compute_social_influence_matrix(system: &MultiAgentSystem) -> Result<DMatrix<f64>> {
    let kl = compute_kl_matrix(system, KlMode::Belief)?;
    compute_softmax_weights(&kl, system, system.config().kappa_beta)
}

/// Attention weights for the given comparison mode at the system temperature.
pub(crate) fn attention_weights(system: &MultiAgentSystem, mode: KlMode) -> Result<DMatrix<f64>> {
    let kl = compute_kl_matrix(system, mode)?;
    compute_softmax_weights(&kl, system, system.config().kappa_beta)
}
