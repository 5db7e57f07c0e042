//! Read-only observables for downstream consumers.
//!
//! Nothing here mutates the system; analysis layers read belief state,
//! attention, inertia, and dispersion through these functions.

use doxa_data::MultiAgentSystem;

use crate::error::Result;

/// Coefficient of dispersion of pairwise belief-mean distances.
///
/// Returns `variance / mean` of the Euclidean distances between all agent
/// pairs in the global frame. Near zero when agents agree (or disagree
/// uniformly); large when the population splits into clusters at mixed
/// distances. Systems with fewer than two agents score zero.
pub fn compute_polarization(system: &MultiAgentSystem) -> f64 {
    let agents = system.agents();
    let n = agents.len();
    if n < 2 {
        return 0.0;
    }

    let global_means: Vec<_> = agents
        .iter()
        .map(|a| a.frame.rotation() * &a.belief.mean)
        .collect();

    let mut distances = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            distances.push((&global_means[i] - &global_means[j]).norm());
        }
    }

    let count = distances.len() as f64;
    let mean = distances.iter().sum::<f64>() / count;
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / count;
    variance / (mean + 1e-8)
}

/// Mean pairwise belief-mean distance in the global frame; a consensus
/// indicator that goes to zero as beliefs coincide.
pub fn compute_mean_belief_distance(system: &MultiAgentSystem) -> f64 {
    let agents = system.agents();
    let n = agents.len();
    if n < 2 {
        return 0.0;
    }
    let global_means: Vec<_> = agents
        .iter()
        .map(|a| a.frame.rotation() * &a.belief.mean)
        .collect();
    let mut total = 0.0;
    let mut count = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += (&global_means[i] - &global_means[j]).norm();
            count += 1.0;
        }
    }
    total / count
}

/// Mean belief-vs-prior KL over agents; how far the population has moved
/// from its priors.
pub fn compute_mean_self_divergence(system: &MultiAgentSystem) -> Result<f64> {
    let energy = crate::free_energy::compute_self_energy(system)?;
    Ok(energy / system.n_agents() as f64)
}
