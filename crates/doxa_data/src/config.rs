//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structs that map to an optional `doxa.toml`
//! file. Every struct is validated through a single `validate()` entry point;
//! invalid combinations are rejected at construction time, never at step time.
//!
//! ## Example `doxa.toml`
//!
//! ```toml
//! [agent]
//! belief_dim = 3
//! mu_scale = 0.5
//! sigma_scale = 0.3
//!
//! [system]
//! lambda_self = 1.0
//! lambda_belief_align = 0.5
//! kappa_beta = 1.0
//! ```

use serde::{Deserialize, Serialize};

/// Per-agent construction parameters.
///
/// Controls the belief dimension and the distribution initial beliefs are
/// sampled from, plus the learning rates used by the update engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Belief dimension K (means are length-K vectors, covariances K x K)
    pub belief_dim: usize,
    /// Half-width of the uniform distribution initial means are drawn from
    pub mu_scale: f64,
    /// Isotropic scale of the initial belief covariance (must be positive)
    pub sigma_scale: f64,
    /// Magnitude of the random SPD jitter added to the initial covariance
    pub sigma_jitter: f64,
    /// Isotropic scale of the prior covariance (must be positive)
    pub prior_scale: f64,
    /// Learning rate for mean updates
    pub lr_mu: f64,
    /// Learning rate for covariance updates
    pub lr_sigma: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            belief_dim: 3,
            mu_scale: 0.5,
            sigma_scale: 0.3,
            sigma_jitter: 0.05,
            prior_scale: 1.0,
            lr_mu: 0.1,
            lr_sigma: 0.01,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.belief_dim > 0, "Belief dimension must be positive");
        anyhow::ensure!(
            self.belief_dim <= 256,
            "Belief dimension too large (max 256)"
        );
        anyhow::ensure!(
            self.mu_scale.is_finite() && self.mu_scale >= 0.0,
            "Mean scale must be finite and non-negative"
        );
        anyhow::ensure!(
            self.sigma_scale.is_finite() && self.sigma_scale > 0.0,
            "Covariance scale must be finite and positive"
        );
        anyhow::ensure!(
            self.sigma_jitter.is_finite() && self.sigma_jitter >= 0.0,
            "Covariance jitter must be finite and non-negative"
        );
        anyhow::ensure!(
            self.prior_scale.is_finite() && self.prior_scale > 0.0,
            "Prior scale must be finite and positive"
        );
        anyhow::ensure!(
            self.lr_mu.is_finite() && self.lr_mu >= 0.0,
            "Mean learning rate must be finite and non-negative"
        );
        anyhow::ensure!(
            self.lr_sigma.is_finite() && self.lr_sigma >= 0.0,
            "Covariance learning rate must be finite and non-negative"
        );
        Ok(())
    }
}

/// System-level coupling weights and the social softmax temperature.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SystemConfig {
    /// Weight of the self energy (belief-vs-own-prior KL)
    pub lambda_self: f64,
    /// Weight of the belief-alignment energy
    pub lambda_belief_align: f64,
    /// Weight of the prior-alignment energy
    pub lambda_prior_align: f64,
    /// Softmax temperature for social attention (must be positive)
    pub kappa_beta: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            lambda_self: 1.0,
            lambda_belief_align: 0.5,
            lambda_prior_align: 0.3,
            kappa_beta: 1.0,
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.lambda_self.is_finite() && self.lambda_self >= 0.0,
            "lambda_self must be finite and non-negative"
        );
        anyhow::ensure!(
            self.lambda_belief_align.is_finite() && self.lambda_belief_align >= 0.0,
            "lambda_belief_align must be finite and non-negative"
        );
        anyhow::ensure!(
            self.lambda_prior_align.is_finite() && self.lambda_prior_align >= 0.0,
            "lambda_prior_align must be finite and non-negative"
        );
        anyhow::ensure!(
            self.kappa_beta.is_finite() && self.kappa_beta > 0.0,
            "kappa_beta (softmax temperature) must be finite and positive"
        );
        Ok(())
    }
}

/// Parameters for the overdamped gradient-flow trainer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Stop early when the per-step energy decrease falls below this value
    pub convergence_tol: f64,
    /// Emit a tracing event every this many steps (0 disables)
    pub log_interval: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            convergence_tol: 1e-10,
            log_interval: 100,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.convergence_tol.is_finite() && self.convergence_tol >= 0.0,
            "Convergence tolerance must be finite and non-negative"
        );
        Ok(())
    }
}

/// Parameters for the underdamped (leapfrog) Hamiltonian trainer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LeapfrogConfig {
    /// Integration time step
    pub dt: f64,
    /// Rebuild the mass matrix every step instead of freezing it at start.
    /// A frozen mass keeps the integrator symplectic; refreshing models
    /// slowly varying epistemic inertia.
    pub refresh_mass: bool,
    /// Emit a tracing event every this many steps (0 disables)
    pub log_interval: u64,
}

impl Default for LeapfrogConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            refresh_mass: false,
            log_interval: 100,
        }
    }
}

impl LeapfrogConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.dt.is_finite() && self.dt > 0.0,
            "Leapfrog time step must be finite and positive"
        );
        anyhow::ensure!(self.dt <= 1.0, "Leapfrog time step too large (max 1.0)");
        Ok(())
    }
}

/// Top-level configuration bundle.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub leapfrog: LeapfrogConfig,
}

impl SimulationConfig {
    /// Validates all configuration sections.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.agent.validate()?;
        self.system.validate()?;
        self.training.validate()?;
        self.leapfrog.validate()?;
        Ok(())
    }

    /// Loads and validates configuration from TOML content.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}
