//! Coupled agents with shared priors reach consensus.

mod common;

use common::{agent_at, weights};
use doxa_core::Trainer;
use doxa_data::{MultiAgentSystem, TrainingConfig};

#[test]
fn test_two_agents_converge_to_shared_mean() {
    // Identical priors at the origin, strong coupling: both the self term
    // and the alignment term pull the means together.
    let agents = vec![agent_at(0, 1.0), agent_at(1, -1.0)];
    let system = MultiAgentSystem::fully_connected(agents, weights(1.0, 1.0, 0.0)).unwrap();
    let mut trainer = Trainer::new(system, TrainingConfig::default());
    trainer.train(2000).unwrap();

    let agents = trainer.system().agents();
    let gap = (&agents[0].belief.mean - &agents[1].belief.mean).norm();
    assert!(gap < 1e-3, "means still {gap} apart after training");
}

#[test]
fn test_consensus_point_is_symmetric() {
    // A symmetric initial condition relaxes to a symmetric fixed point: the
    // shared mean is the prior mean.
    let agents = vec![agent_at(0, 2.0), agent_at(1, -2.0)];
    let system = MultiAgentSystem::fully_connected(agents, weights(1.0, 1.0, 0.0)).unwrap();
    let mut trainer = Trainer::new(system, TrainingConfig::default());
    trainer.train(2000).unwrap();

    for agent in trainer.system().agents() {
        assert!(agent.belief.mean.amax() < 1e-3);
    }
}

#[test]
fn test_larger_population_contracts() {
    let agents = (0..5)
        .map(|i| agent_at(i, (i as f64) - 2.0))
        .collect::<Vec<_>>();
    let start_spread = 4.0;
    let system = MultiAgentSystem::fully_connected(agents, weights(1.0, 1.0, 0.5)).unwrap();
    let mut trainer = Trainer::new(system, TrainingConfig::default());
    trainer.train(1000).unwrap();

    let means: Vec<f64> = trainer
        .system()
        .agents()
        .iter()
        .map(|a| a.belief.mean[0])
        .collect();
    let spread = means.iter().cloned().fold(f64::MIN, f64::max)
        - means.iter().cloned().fold(f64::MAX, f64::min);
    assert!(spread < start_spread * 0.1, "spread only shrank to {spread}");
}
