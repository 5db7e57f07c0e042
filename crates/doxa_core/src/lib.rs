//! # Doxa Core
//!
//! The belief-dynamics engine for Doxa - an information-geometric simulation
//! of interacting Gaussian beliefs.
//!
//! This crate contains the deterministic engine logic, including:
//! - KL divergence, entropy, and Fisher-metric rescaling for Gaussians
//! - Gauge-frame parallel transport between agent coordinate systems
//! - Softmax social attention over pairwise KL divergences
//! - The variational free-energy functional and its closed-form gradients
//! - SPD retraction and the synchronous update engine
//! - Epistemic-inertia mass matrices
//! - Overdamped (gradient-flow) and underdamped (leapfrog) trainers
//! - Read-only analysis observables and structured logging
//!
//! ## Architecture
//!
//! Each step is a pure function of the system snapshot: energies and
//! gradients are computed for every agent from the same frozen state
//! (Rayon-parallel across agents), then committed synchronously through the
//! retraction engine. Covariances are SPD by construction and stay SPD
//! through every update, or the step fails loudly.
//!
//! ## Example
//!
//! ```
//! use doxa_core::Trainer;
//! use doxa_data::{Agent, Gaussian, MultiAgentSystem, SystemConfig, TrainingConfig};
//! use nalgebra::{DMatrix, DVector};
//!
//! let make = |id: usize, x: f64| {
//!     let belief = Gaussian::new(
//!         DVector::from_vec(vec![x, 0.0]),
//!         DMatrix::identity(2, 2),
//!     )
//!     .unwrap();
//!     let prior = Gaussian::isotropic(2, 1.0).unwrap();
//!     Agent::new(id, belief, prior).unwrap()
//! };
//! let system = MultiAgentSystem::fully_connected(
//!     vec![make(0, 1.0), make(1, -1.0)],
//!     SystemConfig::default(),
//! )
//! .unwrap();
//!
//! let mut trainer = Trainer::new(system, TrainingConfig::default());
//! let history = trainer.train(100).unwrap();
//! assert!(history.final_energy().unwrap() < history.records()[0].breakdown.total);
//! ```

/// Read-only observables (polarization, dispersion, divergence)
pub mod analysis;
/// Softmax social attention over pairwise KL divergences
pub mod attention;
/// Engine error types
pub mod error;
/// KL divergence, entropy, and Fisher-metric natural rescaling
pub mod fisher;
/// The variational free-energy functional and its breakdown
pub mod free_energy;
/// Closed-form Euclidean and natural gradients of the free energy
pub mod gradients;
/// Underdamped leapfrog dynamics with epistemic inertia
pub mod hamiltonian;
/// Structured logging setup
pub mod logging;
/// Epistemic-inertia mass matrices
pub mod mass_matrix;
/// SPD retraction and the synchronous update engine
pub mod retraction;
/// SPD matrix utilities (symmetrize, certify, invert)
pub mod spd;
/// Overdamped natural-gradient descent
pub mod trainer;
/// Gauge-frame parallel transport
pub mod transport;

pub use analysis::{
    compute_mean_belief_distance, compute_mean_self_divergence, compute_polarization,
};
pub use attention::{
    compute_kl_matrix, compute_social_influence_matrix, compute_softmax_weights, KlMode,
};
pub use error::{CoreError, Result};
pub use fisher::{
    compute_fisher_matrix, entropy_gaussian, kl_gaussian, natural_mu_gradient,
    natural_sigma_gradient,
};
pub use free_energy::{compute_total_free_energy, FreeEnergyBreakdown};
pub use gradients::{compute_euclidean_gradients, compute_natural_gradients, AgentGradients};
pub use hamiltonian::{HamiltonianHistory, HamiltonianRecord, HamiltonianTrainer};
pub use logging::init_logging;
pub use mass_matrix::{
    build_full_mass_matrix, build_mu_mass_matrix, compute_epistemic_inertia, MassMatrixConfig,
};
pub use retraction::{retract_spd, retract_spd_cholesky, GradientApplier};
pub use trainer::{EnergyRecord, Trainer, TrainingHistory};
pub use transport::{rotation_generators, transport_gaussian, transport_operator, FrameOps};
