use criterion::{black_box, criterion_group, criterion_main, Criterion};
use doxa_core::{
    build_mu_mass_matrix, compute_euclidean_gradients, compute_social_influence_matrix,
    compute_total_free_energy, HamiltonianTrainer, MassMatrixConfig, Trainer,
};
use doxa_data::{
    Agent, AgentConfig, LeapfrogConfig, MultiAgentSystem, SystemConfig, TrainingConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn seeded_system(n_agents: usize, belief_dim: usize) -> MultiAgentSystem {
    let agent_config = AgentConfig {
        belief_dim,
        ..Default::default()
    };
    let agents = (0..n_agents)
        .map(|id| {
            let mut rng = ChaCha8Rng::seed_from_u64(42 + id as u64);
            Agent::from_config(id, &agent_config, &mut rng).unwrap()
        })
        .collect();
    MultiAgentSystem::fully_connected(agents, SystemConfig::default()).unwrap()
}

/// Benchmark the full free-energy evaluation.
fn bench_free_energy(c: &mut Criterion) {
    let system = seeded_system(16, 3);

    c.bench_function("free_energy_16x3", |b| {
        b.iter(|| {
            let breakdown = compute_total_free_energy(black_box(&system)).unwrap();
            black_box(breakdown)
        })
    });
}

/// Benchmark the social attention matrix.
fn bench_attention(c: &mut Criterion) {
    let system = seeded_system(16, 3);

    c.bench_function("attention_16x3", |b| {
        b.iter(|| {
            let beta = compute_social_influence_matrix(black_box(&system)).unwrap();
            black_box(beta)
        })
    });
}

/// Benchmark the parallel gradient scatter.
fn bench_gradients(c: &mut Criterion) {
    let system = seeded_system(16, 3);

    c.bench_function("euclidean_gradients_16x3", |b| {
        b.iter(|| {
            let grads = compute_euclidean_gradients(black_box(&system)).unwrap();
            black_box(grads)
        })
    });
}

/// Benchmark the block-diagonal mass matrix.
fn bench_mass_matrix(c: &mut Criterion) {
    let system = seeded_system(16, 3);
    let config = MassMatrixConfig::default();

    c.bench_function("mu_mass_matrix_16x3", |b| {
        b.iter(|| {
            let mass = build_mu_mass_matrix(black_box(&system), &config).unwrap();
            black_box(mass)
        })
    });
}

/// Benchmark one overdamped training step.
fn bench_trainer_step(c: &mut Criterion) {
    let mut trainer = Trainer::new(seeded_system(16, 3), TrainingConfig::default());

    c.bench_function("trainer_step_16x3", |b| {
        b.iter(|| {
            let breakdown = trainer.step().unwrap();
            black_box(breakdown)
        })
    });
}

/// Benchmark one leapfrog step.
fn bench_leapfrog_step(c: &mut Criterion) {
    let config = LeapfrogConfig {
        log_interval: 0,
        ..Default::default()
    };
    let mut trainer = HamiltonianTrainer::new(seeded_system(16, 3), config);

    c.bench_function("leapfrog_step_16x3", |b| {
        b.iter(|| {
            let record = trainer.step().unwrap();
            black_box(record)
        })
    });
}

criterion_group!(
    benches,
    bench_free_energy,
    bench_attention,
    bench_gradients,
    bench_mass_matrix,
    bench_trainer_step,
    bench_leapfrog_step
);
criterion_main!(benches);
