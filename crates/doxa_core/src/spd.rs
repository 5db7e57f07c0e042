//! SPD-safe matrix utilities.
//!
//! Every covariance in the engine must be symmetric positive definite, and
//! floating-point arithmetic keeps trying to break that. `symmetrize` is
//! applied after any operation that could introduce asymmetry; `ensure_spd`
//! is the construction-time chokepoint that either yields a certified SPD
//! matrix or fails fast with a numeric-domain error.

use nalgebra::{Cholesky, DMatrix};

use crate::error::{CoreError, Result};

/// `(M + M^T) / 2`.
#[must_use]
pub fn symmetrize(m: &DMatrix<f64>) -> DMatrix<f64> {
    (m + m.transpose()) * 0.5
}

/// Whether every entry is finite.
#[must_use]
pub fn all_finite(m: &DMatrix<f64>) -> bool {
    m.iter().all(|v| v.is_finite())
}

/// Whether the matrix is SPD, tested via Cholesky success.
#[must_use]
pub fn is_spd(m: &DMatrix<f64>) -> bool {
    all_finite(m) && Cholesky::new(symmetrize(m)).is_some()
}

/// Symmetrizes, adds `eps * I`, and certifies the result SPD.
///
/// Fails fast on NaN/Inf or on matrices whose spectrum stays non-positive
/// after regularization; such inputs are not repairable here and belong to
/// the retraction path instead.
pub fn ensure_spd(m: &DMatrix<f64>, eps: f64) -> Result<DMatrix<f64>> {
    if !all_finite(m) {
        return Err(CoreError::numeric(
            "ensure_spd: matrix contains NaN or Inf entries",
        ));
    }
    if !m.is_square() {
        return Err(CoreError::dimension(format!(
            "ensure_spd: matrix is {}x{}, expected square",
            m.nrows(),
            m.ncols()
        )));
    }
    let k = m.nrows();
    let mut out = symmetrize(m);
    for i in 0..k {
        out[(i, i)] += eps;
    }
    if Cholesky::new(out.clone()).is_none() {
        return Err(CoreError::numeric(
            "ensure_spd: matrix is not positive definite after regularization",
        ));
    }
    Ok(out)
}

/// Inverse of an SPD matrix via Cholesky, with a regularized retry.
///
/// The retry covers near-singular but honestly positive matrices; anything
/// that still fails is a numeric-domain error, not something to clamp.
pub fn safe_inv(m: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if !all_finite(m) {
        return Err(CoreError::numeric(
            "safe_inv: matrix contains NaN or Inf entries",
        ));
    }
    let sym = symmetrize(m);
    if let Some(chol) = Cholesky::new(sym.clone()) {
        return Ok(chol.inverse());
    }
    let regularized = ensure_spd(&sym, 1e-10)?;
    Cholesky::new(regularized)
        .map(|chol| chol.inverse())
        .ok_or_else(|| CoreError::numeric("safe_inv: matrix is not invertible as SPD"))
}

/// `ln det(M)` for SPD `M`, via the Cholesky factor.
pub fn log_det_spd(m: &DMatrix<f64>) -> Result<f64> {
    if !all_finite(m) {
        return Err(CoreError::numeric(
            "log_det_spd: matrix contains NaN or Inf entries",
        ));
    }
    let chol = Cholesky::new(symmetrize(m))
        .ok_or_else(|| CoreError::numeric("log_det_spd: matrix is not SPD"))?;
    let mut log_det = 0.0;
    let l = chol.l();
    for i in 0..l.nrows() {
        let d = l[(i, i)];
        if d <= 0.0 || !d.is_finite() {
            return Err(CoreError::numeric(
                "log_det_spd: degenerate Cholesky diagonal",
            ));
        }
        log_det += d.ln();
    }
    Ok(2.0 * log_det)
}
