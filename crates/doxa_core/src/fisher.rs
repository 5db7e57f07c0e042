//! Fisher information metric, KL divergence, and natural-gradient rescaling.
//!
//! Beliefs live on a curved statistical manifold, so discrepancies are
//! measured with the KL divergence and gradients are rescaled by the inverse
//! Fisher metric rather than taken at face value. For a Gaussian the mean
//! block of the Fisher metric is the precision `Sigma^-1`; the covariance
//! block acts on a perturbation `G` as `(1/2) Sigma^-1 G Sigma^-1`, whose
//! inverse action is `2 Sigma G Sigma`.

use nalgebra::DMatrix;

use doxa_data::Gaussian;

use crate::error::{CoreError, Result};
use crate::spd::{log_det_spd, safe_inv, symmetrize};

/// `KL(q || p)` between two Gaussians of equal dimension.
///
/// Always non-negative; zero iff the distributions coincide.
pub fn kl_gaussian(q: &Gaussian, p: &Gaussian) -> Result<f64> {
    if q.dim() != p.dim() {
        return Err(CoreError::dimension(format!(
            "KL between dimensions {} and {}",
            q.dim(),
            p.dim()
        )));
    }
    let k = q.dim() as f64;
    let p_prec = safe_inv(&p.cov)?;
    let trace = (&p_prec * &q.cov).trace();
    let diff = &p.mean - &q.mean;
    let maha = diff.dot(&(&p_prec * &diff));
    let log_det_ratio = log_det_spd(&p.cov)? - log_det_spd(&q.cov)?;
    let kl = 0.5 * (trace + maha - k + log_det_ratio);
    if !kl.is_finite() {
        return Err(CoreError::numeric("KL divergence is not finite"));
    }
    // Tiny negatives are floating-point noise on identical inputs.
    Ok(kl.max(0.0))
}

/// Differential entropy of a Gaussian.
pub fn entropy_gaussian(g: &Gaussian) -> Result<f64> {
    let k = g.dim() as f64;
    Ok(0.5 * (k * (1.0 + (2.0 * std::f64::consts::PI).ln()) + log_det_spd(&g.cov)?))
}

/// Mean-block Fisher information matrix at a belief point: the precision.
pub fn compute_fisher_matrix(g: &Gaussian) -> Result<DMatrix<f64>> {
    safe_inv(&g.cov)
}

/// Inverse-Fisher action on a Euclidean mean gradient: `Sigma g`.
#[must_use]
pub fn natural_mu_gradient(cov: &DMatrix<f64>, grad: &nalgebra::DVector<f64>) -> nalgebra::DVector<f64> {
    cov * grad
}

/// Inverse-Fisher action on a Euclidean covariance gradient:
/// `2 Sigma G Sigma`, symmetrized to stay tangent to the SPD manifold.
#[must_use]
pub fn natural_sigma_gradient(cov: &DMatrix<f64>, grad: &DMatrix<f64>) -> DMatrix<f64> {
    symmetrize(&(cov * grad * cov * 2.0))
}
