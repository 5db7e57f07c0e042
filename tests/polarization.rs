//! Weakly coupled agents with entrenched priors stay apart.

mod common;

use common::{entrenched_agent_at, weights};
use doxa_core::{compute_polarization, Trainer};
use doxa_data::{MultiAgentSystem, TrainingConfig};

#[test]
fn test_weak_coupling_preserves_disagreement() {
    // Priors centered on each agent's own position and a tiny alignment
    // weight: the self term dominates and the gap survives.
    let agents = vec![entrenched_agent_at(0, -2.0), entrenched_agent_at(1, 2.0)];
    let system = MultiAgentSystem::fully_connected(agents, weights(1.0, 0.01, 0.0)).unwrap();
    let mut trainer = Trainer::new(system, TrainingConfig::default());
    trainer.train(3000).unwrap();

    let agents = trainer.system().agents();
    let gap = (&agents[0].belief.mean - &agents[1].belief.mean).norm();
    assert!(gap > 1.0, "agents collapsed to a gap of {gap}");
}

#[test]
fn test_strong_coupling_closes_the_same_gap() {
    let agents = vec![entrenched_agent_at(0, -2.0), entrenched_agent_at(1, 2.0)];
    let system = MultiAgentSystem::fully_connected(agents, weights(0.1, 5.0, 0.0)).unwrap();
    let mut trainer = Trainer::new(system, TrainingConfig::default());
    trainer.train(3000).unwrap();

    let agents = trainer.system().agents();
    let gap = (&agents[0].belief.mean - &agents[1].belief.mean).norm();
    assert!(gap < 0.5, "gap of {gap} despite strong coupling");
}

#[test]
fn test_polarization_metric_separates_regimes() {
    // Four agents in two entrenched camps with weak coupling stay bimodal;
    // the dispersion statistic sees mixed pairwise distances.
    let camps = vec![
        entrenched_agent_at(0, -3.0),
        entrenched_agent_at(1, -2.9),
        entrenched_agent_at(2, 2.9),
        entrenched_agent_at(3, 3.0),
    ];
    let system = MultiAgentSystem::fully_connected(camps, weights(1.0, 0.01, 0.0)).unwrap();
    let mut trainer = Trainer::new(system, TrainingConfig::default());
    trainer.train(500).unwrap();
    let polarized = compute_polarization(trainer.system());

    let consensus = vec![
        entrenched_agent_at(0, -0.1),
        entrenched_agent_at(1, 0.0),
        entrenched_agent_at(2, 0.05),
        entrenched_agent_at(3, 0.1),
    ];
    let system = MultiAgentSystem::fully_connected(consensus, weights(1.0, 1.0, 0.0)).unwrap();
    let mut trainer = Trainer::new(system, TrainingConfig::default());
    trainer.train(500).unwrap();
    let agreed = compute_polarization(trainer.system());

    assert!(polarized > agreed);
}
