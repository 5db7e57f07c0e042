//! A single agent: belief, prior, gauge frame, support, learning rates.

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::gaussian::{Gaussian, GaugeFrame};
use crate::manifold::SupportRegion;

/// An individual holding a Gaussian belief and a Gaussian prior over the
/// conceptual space.
///
/// The belief `(mu_q, Sigma_q)` is mutated every step by the gradient and
/// retraction pipeline in `doxa_core`; the prior `(mu_p, Sigma_p)` is fixed.
/// Covariances are symmetric positive definite at all times - the engine's
/// retraction step guarantees this after every update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Agent {
    pub id: usize,
    /// Current belief q = N(mu_q, Sigma_q)
    pub belief: Gaussian,
    /// Personal prior p = N(mu_p, Sigma_p), the agent's ideological baseline
    pub prior: Gaussian,
    /// Orientation of this agent's conceptual axes
    pub frame: GaugeFrame,
    /// Coordinates of the base manifold this agent holds opinions on.
    /// Must cover every coordinate; `MultiAgentSystem::new` rejects
    /// partial masks.
    pub support: SupportRegion,
    /// Learning rate for mean updates
    pub lr_mu: f64,
    /// Learning rate for covariance updates
    pub lr_sigma: f64,
    /// Externally supplied evidence for the current step, if any
    pub observation: Option<Gaussian>,
}

impl Agent {
    /// Creates an agent with an identity gauge frame, full support, and the
    /// default learning rates.
    pub fn new(id: usize, belief: Gaussian, prior: Gaussian) -> anyhow::Result<Self> {
        anyhow::ensure!(
            belief.dim() == prior.dim(),
            "Agent {id}: belief dimension {} does not match prior dimension {}",
            belief.dim(),
            prior.dim()
        );
        let k = belief.dim();
        let defaults = AgentConfig::default();
        Ok(Self {
            id,
            belief,
            prior,
            frame: GaugeFrame::identity(k),
            support: SupportRegion::new(vec![true; k])?,
            lr_mu: defaults.lr_mu,
            lr_sigma: defaults.lr_sigma,
            observation: None,
        })
    }

    /// Samples an agent from a configuration and a seeded random source.
    ///
    /// The initial mean is uniform in `[-mu_scale, mu_scale]^K`; the initial
    /// covariance is `sigma_scale^2 I + J J^T` with `J` a uniform jitter
    /// matrix, so it is SPD by construction. The prior is centered at zero
    /// with covariance `prior_scale^2 I`.
    ///
    /// Callers own reproducibility: derive one rng per agent from a global
    /// seed (e.g. `ChaCha8Rng::seed_from_u64(seed + id as u64)`) for runs
    /// that must be replayable agent-by-agent.
    pub fn from_config<R: Rng>(id: usize, config: &AgentConfig, rng: &mut R) -> anyhow::Result<Self> {
        config.validate()?;
        let k = config.belief_dim;

        let mean = DVector::from_fn(k, |_, _| {
            if config.mu_scale > 0.0 {
                rng.gen_range(-config.mu_scale..config.mu_scale)
            } else {
                0.0
            }
        });

        let mut cov = DMatrix::identity(k, k) * (config.sigma_scale * config.sigma_scale);
        if config.sigma_jitter > 0.0 {
            let jitter = DMatrix::from_fn(k, k, |_, _| {
                rng.gen_range(-config.sigma_jitter..config.sigma_jitter)
            });
            cov += &jitter * jitter.transpose();
        }

        let belief = Gaussian::new(mean, cov)?;
        let prior = Gaussian::isotropic(k, config.prior_scale)?;

        let mut agent = Self::new(id, belief, prior)?;
        agent.lr_mu = config.lr_mu;
        agent.lr_sigma = config.lr_sigma;
        Ok(agent)
    }

    /// Belief dimension K.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.belief.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_from_config_deterministic() {
        let config = AgentConfig::default();
        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);
        let a = Agent::from_config(0, &config, &mut rng1).unwrap();
        let b = Agent::from_config(0, &config, &mut rng2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_config_mean_within_scale() {
        let config = AgentConfig {
            mu_scale: 0.25,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let agent = Agent::from_config(3, &config, &mut rng).unwrap();
        assert!(agent.belief.mean.iter().all(|v| v.abs() <= 0.25));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let belief = Gaussian::isotropic(3, 1.0).unwrap();
        let prior = Gaussian::isotropic(2, 1.0).unwrap();
        assert!(Agent::new(0, belief, prior).is_err());
    }

    #[test]
    fn test_initial_covariance_is_spd() {
        let config = AgentConfig {
            sigma_jitter: 0.2,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let agent = Agent::from_config(0, &config, &mut rng).unwrap();
        assert!(nalgebra::Cholesky::new(agent.belief.cov.clone()).is_some());
    }
}
