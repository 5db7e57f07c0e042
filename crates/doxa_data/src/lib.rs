//! # Doxa Data
//!
//! Shared data types for the doxa belief-dynamics engine.
//!
//! This crate holds the passive state that the engine in `doxa_core` operates
//! on: Gaussian belief distributions, gauge frames, the base conceptual
//! manifold with per-agent support regions, agents, the multi-agent system,
//! and the validated configuration structs that parameterize a run.
//!
//! All types are serde-serializable value objects; the algorithms that
//! mutate them live in `doxa_core`.

/// Validated configuration structs and TOML loading
pub mod config;
/// Gaussian belief distributions and gauge frames
pub mod gaussian;
/// Base conceptual manifold and per-agent support regions
pub mod manifold;

mod agent;
mod system;

pub use agent::Agent;
pub use config::{
    AgentConfig, LeapfrogConfig, SimulationConfig, SystemConfig, TrainingConfig,
};
pub use gaussian::{Gaussian, GaugeFrame};
pub use manifold::{create_full_support, BaseManifold, SupportRegion, TopologyType};
pub use system::{Connectivity, MultiAgentSystem};
