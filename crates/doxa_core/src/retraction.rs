//! SPD retraction and the update engine.
//!
//! A raw gradient step on a covariance has no reason to stay positive
//! definite. Retraction projects the perturbed matrix back onto the SPD
//! manifold: try Cholesky first (the common case needs no repair), otherwise
//! clamp the symmetric eigendecomposition's spectrum and recompose. Repair
//! that fails to produce a certified SPD matrix is a hard error - a corrupted
//! covariance would silently invalidate every later KL and Fisher
//! computation, so no best-effort fallback exists.

use nalgebra::{Cholesky, DMatrix, SymmetricEigen};

use doxa_data::MultiAgentSystem;

use crate::error::{CoreError, Result};
use crate::gradients::AgentGradients;
use crate::spd::{all_finite, symmetrize};

/// Default spectral floor for retraction.
pub const DEFAULT_RETRACTION_EPS: f64 = 1e-8;

/// Projects a perturbed covariance onto the SPD manifold by clamping its
/// spectrum to `eps` and recomposing.
pub fn retract_spd(m: &DMatrix<f64>, eps: f64) -> Result<DMatrix<f64>> {
    if !all_finite(m) {
        return Err(CoreError::numeric(
            "retract_spd: matrix contains NaN or Inf entries",
        ));
    }
    if eps <= 0.0 || !eps.is_finite() {
        return Err(CoreError::numeric(format!(
            "retract_spd: spectral floor must be positive, got {eps}"
        )));
    }
    let sym = symmetrize(m);
    let eigen = SymmetricEigen::new(sym);
    let clamped = eigen.eigenvalues.map(|v| v.max(eps));
    let repaired = symmetrize(
        &(&eigen.eigenvectors * DMatrix::from_diagonal(&clamped) * eigen.eigenvectors.transpose()),
    );
    if Cholesky::new(repaired.clone()).is_none() {
        return Err(CoreError::numeric(
            "retract_spd: repaired matrix still fails Cholesky",
        ));
    }
    Ok(repaired)
}

/// Cholesky fast path: returns the symmetrized matrix untouched when it is
/// already SPD, falling back to spectral repair otherwise.
pub fn retract_spd_cholesky(m: &DMatrix<f64>, eps: f64) -> Result<DMatrix<f64>> {
    if !all_finite(m) {
        return Err(CoreError::numeric(
            "retract_spd_cholesky: matrix contains NaN or Inf entries",
        ));
    }
    let sym = symmetrize(m);
    if Cholesky::new(sym.clone()).is_some() {
        return Ok(sym);
    }
    retract_spd(&sym, eps)
}

/// Applies a scaled gradient step to every agent, with retraction.
///
/// The gradients were computed from the pre-step snapshot, so the commit
/// order is irrelevant: no agent's update reads another agent's state.
#[derive(Debug, Clone, Copy)]
pub struct GradientApplier {
    /// Spectral floor used by retraction
    pub eps: f64,
}

impl Default for GradientApplier {
    fn default() -> Self {
        Self {
            eps: DEFAULT_RETRACTION_EPS,
        }
    }
}

impl GradientApplier {
    /// Commits `mu_q <- mu_q - lr_mu * grad_mu` and
    /// `Sigma_q <- retract(Sigma_q - lr_sigma * grad_sigma)` for every agent.
    pub fn apply(
        &self,
        system: &mut MultiAgentSystem,
        gradients: &[AgentGradients],
    ) -> Result<()> {
        if gradients.len() != system.n_agents() {
            return Err(CoreError::dimension(format!(
                "{} gradients for {} agents",
                gradients.len(),
                system.n_agents()
            )));
        }
        for (agent, grad) in system.agents_mut().iter_mut().zip(gradients) {
            if grad.mu.len() != agent.belief.mean.len() {
                return Err(CoreError::dimension(format!(
                    "gradient dimension {} for agent {} of dimension {}",
                    grad.mu.len(),
                    agent.id,
                    agent.belief.mean.len()
                )));
            }
            agent.belief.mean -= &grad.mu * agent.lr_mu;
            if agent.lr_sigma > 0.0 {
                let proposed = &agent.belief.cov - &grad.sigma * agent.lr_sigma;
                agent.belief.cov =
                    retract_spd_cholesky(&proposed, self.eps).map_err(|e| CoreError::NotSpd {
                        agent: agent.id,
                        reason: e.to_string(),
                    })?;
            }
        }
        Ok(())
    }
}
