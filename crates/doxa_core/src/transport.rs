//! Parallel transport between agent gauge frames.
//!
//! Agents may reason in rotated copies of the conceptual coordinate axes.
//! Before any cross-agent comparison, one agent's distribution is transported
//! into the other's frame by the relative rotation between frames. The
//! transport operator is orthogonal, so it is an isometry of the belief space
//! and exactly invertible: i -> j -> i reproduces the original distribution
//! up to floating-point error.
//!
//! For K = 3 the generator basis is the classical so(3) basis; for general K
//! it is the full basis of skew-symmetric K x K matrices, one generator per
//! coordinate plane.

use nalgebra::DMatrix;

use doxa_data::{GaugeFrame, Gaussian};

use crate::error::{CoreError, Result};
use crate::spd::symmetrize;

/// Basis of infinitesimal rotation generators for SO(K).
///
/// Returns `K (K - 1) / 2` skew-symmetric matrices, ordered by coordinate
/// plane `(a, b)` with `a < b`.
#[must_use]
pub fn rotation_generators(dim: usize) -> Vec<DMatrix<f64>> {
    let mut generators = Vec::with_capacity(dim * (dim.saturating_sub(1)) / 2);
    for a in 0..dim {
        for b in (a + 1)..dim {
            let mut g = DMatrix::zeros(dim, dim);
            g[(a, b)] = -1.0;
            g[(b, a)] = 1.0;
            generators.push(g);
        }
    }
    generators
}

/// Gauge-frame operations implemented on the data type.
pub trait FrameOps: Sized {
    /// Builds a frame from generator angles via the matrix exponential of
    /// the corresponding skew-symmetric combination.
    fn from_angles(dim: usize, angles: &[f64]) -> Result<Self>;
}

impl FrameOps for GaugeFrame {
    fn from_angles(dim: usize, angles: &[f64]) -> Result<Self> {
        let generators = rotation_generators(dim);
        if angles.len() != generators.len() {
            return Err(CoreError::dimension(format!(
                "SO({dim}) has {} generators but {} angles were given",
                generators.len(),
                angles.len()
            )));
        }
        if angles.iter().any(|a| !a.is_finite()) {
            return Err(CoreError::numeric("gauge angles contain NaN or Inf"));
        }
        let mut skew = DMatrix::zeros(dim, dim);
        for (theta, g) in angles.iter().zip(generators.iter()) {
            skew += g * *theta;
        }
        let rotation = skew.exp();
        GaugeFrame::from_matrix(rotation)
            .map_err(|e| CoreError::numeric(format!("exponential left the rotation group: {e}")))
    }
}

/// Rotation carrying coordinates of `from`'s frame into `to`'s frame.
pub fn transport_operator(from: &GaugeFrame, to: &GaugeFrame) -> Result<DMatrix<f64>> {
    if from.dim() != to.dim() {
        return Err(CoreError::dimension(format!(
            "cannot transport between frames of dimension {} and {}",
            from.dim(),
            to.dim()
        )));
    }
    Ok(to.rotation().transpose() * from.rotation())
}

/// Applies a transport operator to a Gaussian: `mu' = T mu`,
/// `Sigma' = T Sigma T^T`.
///
/// Orthogonal congruence preserves the spectrum, so the result stays SPD.
pub fn transport_gaussian(g: &Gaussian, operator: &DMatrix<f64>) -> Result<Gaussian> {
    if operator.ncols() != g.dim() {
        return Err(CoreError::dimension(format!(
            "transport operator is {}x{} but the distribution has dimension {}",
            operator.nrows(),
            operator.ncols(),
            g.dim()
        )));
    }
    let mean = operator * &g.mean;
    let cov = symmetrize(&(operator * &g.cov * operator.transpose()));
    Gaussian::new(mean, cov).map_err(|e| CoreError::numeric(e.to_string()))
}
