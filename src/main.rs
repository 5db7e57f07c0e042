//! Command-line runner: build a seeded system, relax it, report energies.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use doxa_lib::{
    compute_polarization, compute_total_free_energy, init_logging, seeded_system,
    HamiltonianTrainer, SimulationConfig, Trainer,
};

#[derive(Parser, Debug)]
#[command(name = "doxa", about = "Belief-dynamics simulation runner")]
struct Args {
    /// Path to a doxa.toml configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of agents
    #[arg(short = 'n', long, default_value_t = 8)]
    agents: usize,

    /// Number of training steps
    #[arg(short, long, default_value_t = 1000)]
    steps: u64,

    /// RNG seed for agent construction
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Use the underdamped (leapfrog) trainer instead of gradient flow
    #[arg(long)]
    hamiltonian: bool,

    /// Write the energy history as JSON to this path
    #[arg(long)]
    history: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            SimulationConfig::from_toml(&content)?
        }
        None => SimulationConfig::default(),
    };

    let system = seeded_system(&config, args.agents, args.seed)?;
    let initial = compute_total_free_energy(&system)?;
    tracing::info!(
        agents = args.agents,
        belief_dim = system.belief_dim(),
        total = initial.total,
        "initial free energy"
    );

    let (system, history_json) = if args.hamiltonian {
        let mut trainer = HamiltonianTrainer::new(system, config.leapfrog);
        let history = trainer.run(args.steps)?;
        (trainer.into_system(), serde_json::to_string_pretty(&history)?)
    } else {
        let mut trainer = Trainer::new(system, config.training);
        let history = trainer.train(args.steps)?;
        (trainer.into_system(), serde_json::to_string_pretty(&history)?)
    };

    let final_energy = compute_total_free_energy(&system)?;
    println!("final free energy: {:.6}", final_energy.total);
    println!("  self energy:     {:.6}", final_energy.self_energy);
    println!("  belief align:    {:.6}", final_energy.belief_align);
    println!("  prior align:     {:.6}", final_energy.prior_align);
    println!("  observation:     {:.6}", final_energy.observation);
    println!("polarization:      {:.6}", compute_polarization(&system));

    if let Some(path) = &args.history {
        std::fs::write(path, history_json)
            .with_context(|| format!("writing history to {}", path.display()))?;
        println!("history written to {}", path.display());
    }
    Ok(())
}
