//! Error types for doxa_core.
//!
//! Numeric-domain failures are fatal and surfaced immediately: a covariance
//! that cannot be repaired to SPD would poison every downstream KL and Fisher
//! computation, so no step is allowed to commit one.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// NaN/Inf inputs, non-invertible matrices, degenerate normalizers
    #[error("Numeric domain error: {0}")]
    NumericDomain(String),

    /// A covariance that remained non-SPD after retraction repair
    #[error("Covariance for agent {agent} is not SPD-repairable: {reason}")]
    NotSpd { agent: usize, reason: String },

    /// Mismatched vector/matrix shapes between agents or operators
    #[error("Dimension mismatch: {0}")]
    Dimension(String),

    /// Softmax temperature outside its valid domain
    #[error("Softmax temperature must be positive, got {0}")]
    InvalidTemperature(f64),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Creates a new numeric-domain error.
    #[must_use]
    pub fn numeric<S: Into<String>>(msg: S) -> Self {
        Self::NumericDomain(msg.into())
    }

    /// Creates a new dimension-mismatch error.
    #[must_use]
    pub fn dimension<S: Into<String>>(msg: S) -> Self {
        Self::Dimension(msg.into())
    }
}
