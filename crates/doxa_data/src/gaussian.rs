//! Gaussian belief distributions and gauge frames.
//!
//! A belief is a Gaussian over the conceptual coordinate space: a length-K
//! mean and a K x K covariance. The covariance of any distribution stored in
//! an [`Agent`](crate::Agent) is kept symmetric positive definite by the
//! engine's retraction step; this module only enforces shape and finiteness.
//!
//! A [`GaugeFrame`] is the orientation of an agent's conceptual axes: a
//! rotation of R^K. Distributions from agents with different frames must be
//! parallel-transported into a common frame before they can be compared.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// A Gaussian distribution over the belief space.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Gaussian {
    pub mean: DVector<f64>,
    pub cov: DMatrix<f64>,
}

impl Gaussian {
    /// Creates a Gaussian, checking shape and finiteness.
    ///
    /// Positive definiteness of the covariance is the engine's invariant and
    /// is enforced by `doxa_core`'s `ensure_spd`/retraction chokepoints.
    pub fn new(mean: DVector<f64>, cov: DMatrix<f64>) -> anyhow::Result<Self> {
        anyhow::ensure!(!mean.is_empty(), "Gaussian mean must be non-empty");
        anyhow::ensure!(
            cov.nrows() == mean.len() && cov.ncols() == mean.len(),
            "Covariance shape {}x{} does not match mean length {}",
            cov.nrows(),
            cov.ncols(),
            mean.len()
        );
        anyhow::ensure!(
            mean.iter().all(|v| v.is_finite()),
            "Gaussian mean contains non-finite values"
        );
        anyhow::ensure!(
            cov.iter().all(|v| v.is_finite()),
            "Gaussian covariance contains non-finite values"
        );
        Ok(Self { mean, cov })
    }

    /// Standard Gaussian with zero mean and isotropic covariance `scale^2 I`.
    pub fn isotropic(dim: usize, scale: f64) -> anyhow::Result<Self> {
        anyhow::ensure!(dim > 0, "Gaussian dimension must be positive");
        anyhow::ensure!(
            scale.is_finite() && scale > 0.0,
            "Isotropic scale must be finite and positive"
        );
        Ok(Self {
            mean: DVector::zeros(dim),
            cov: DMatrix::identity(dim, dim) * (scale * scale),
        })
    }

    /// Belief dimension K.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }
}

/// A per-agent orientation of the conceptual coordinate axes.
///
/// Stored as an orthogonal rotation matrix mapping agent-local coordinates to
/// the shared global frame. Construction from rotation-generator angles lives
/// in `doxa_core::transport`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GaugeFrame {
    rotation: DMatrix<f64>,
}

impl GaugeFrame {
    /// The trivial frame: agent-local coordinates coincide with the global ones.
    #[must_use]
    pub fn identity(dim: usize) -> Self {
        Self {
            rotation: DMatrix::identity(dim, dim),
        }
    }

    /// Wraps a rotation matrix, verifying orthogonality and orientation.
    pub fn from_matrix(rotation: DMatrix<f64>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            rotation.is_square() && rotation.nrows() > 0,
            "Gauge rotation must be a non-empty square matrix"
        );
        anyhow::ensure!(
            rotation.iter().all(|v| v.is_finite()),
            "Gauge rotation contains non-finite values"
        );
        let dim = rotation.nrows();
        let gram = &rotation * rotation.transpose();
        let identity = DMatrix::identity(dim, dim);
        let defect = (&gram - &identity).amax();
        anyhow::ensure!(
            defect < 1e-8,
            "Gauge rotation is not orthogonal (defect {defect:.3e})"
        );
        anyhow::ensure!(
            rotation.determinant() > 0.0,
            "Gauge rotation must be orientation-preserving (det > 0)"
        );
        Ok(Self { rotation })
    }

    /// The rotation matrix mapping agent-local coordinates to global ones.
    #[must_use]
    pub fn rotation(&self) -> &DMatrix<f64> {
        &self.rotation
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.rotation.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_shape_mismatch_rejected() {
        let mean = DVector::zeros(3);
        let cov = DMatrix::identity(2, 2);
        assert!(Gaussian::new(mean, cov).is_err());
    }

    #[test]
    fn test_gaussian_nan_rejected() {
        let mean = DVector::from_vec(vec![0.0, f64::NAN]);
        let cov = DMatrix::identity(2, 2);
        assert!(Gaussian::new(mean, cov).is_err());
    }

    #[test]
    fn test_isotropic() {
        let g = Gaussian::isotropic(3, 0.5).unwrap();
        assert_eq!(g.dim(), 3);
        assert_eq!(g.cov[(0, 0)], 0.25);
        assert_eq!(g.cov[(0, 1)], 0.0);
    }

    #[test]
    fn test_frame_identity_is_orthogonal() {
        let frame = GaugeFrame::identity(4);
        assert!(GaugeFrame::from_matrix(frame.rotation().clone()).is_ok());
    }

    #[test]
    fn test_frame_rejects_non_orthogonal() {
        let m = DMatrix::from_element(3, 3, 0.7);
        assert!(GaugeFrame::from_matrix(m).is_err());
    }

    #[test]
    fn test_frame_rejects_reflection() {
        let mut m = DMatrix::identity(3, 3);
        m[(0, 0)] = -1.0;
        assert!(GaugeFrame::from_matrix(m).is_err());
    }
}
