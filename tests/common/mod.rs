//! Shared builders for the integration suite.

#![allow(dead_code)]

use doxa_data::{Agent, Gaussian, SystemConfig};
use nalgebra::{DMatrix, DVector};

/// Agent with unit belief covariance at `(x, 0)` and a standard prior at the
/// origin.
pub fn agent_at(id: usize, x: f64) -> Agent {
    let belief = Gaussian::new(
        DVector::from_vec(vec![x, 0.0]),
        DMatrix::identity(2, 2),
    )
    .unwrap();
    let prior = Gaussian::isotropic(2, 1.0).unwrap();
    Agent::new(id, belief, prior).unwrap()
}

/// Like [`agent_at`] but with the prior centered on the belief.
pub fn entrenched_agent_at(id: usize, x: f64) -> Agent {
    let mean = DVector::from_vec(vec![x, 0.0]);
    let belief = Gaussian::new(mean.clone(), DMatrix::identity(2, 2)).unwrap();
    let prior = Gaussian::new(mean, DMatrix::identity(2, 2)).unwrap();
    Agent::new(id, belief, prior).unwrap()
}

/// Coupling configuration with every weight explicit.
pub fn weights(lambda_self: f64, belief: f64, prior: f64) -> SystemConfig {
    SystemConfig {
        lambda_self,
        lambda_belief_align: belief,
        lambda_prior_align: prior,
        kappa_beta: 1.0,
    }
}
