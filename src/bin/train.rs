//! Training binary: spin up a table of risk-heterogeneous agents and
//! run the policy-gradient loop, checkpointing as it goes.
//!
//! RUST_LOG=info cargo run --bin train -- --episodes 10000 --players 3

use anyhow::Result;
use clap::Parser;
use pokergym::train::TrainConfig;
use pokergym::train::Trainer;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Train poker agents by multi-agent REINFORCE")]
struct Args {
    /// hands to play; one episode is one hand
    #[arg(long, default_value_t = 10_000)]
    episodes: usize,
    /// seats at the table, one agent per seat (risk profiles round-robin)
    #[arg(long, default_value_t = 3)]
    players: usize,
    /// hidden layer width
    #[arg(long, default_value_t = 128)]
    hidden: usize,
    /// AdamW learning rate
    #[arg(long, default_value_t = 1e-3)]
    learning_rate: f64,
    /// checkpoint every this many episodes
    #[arg(long, default_value_t = 1_000)]
    save_every: usize,
    /// checkpoint directory
    #[arg(long, default_value = "checkpoints")]
    out: PathBuf,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = TrainConfig {
        episodes: args.episodes,
        players: args.players,
        hidden_dim: args.hidden,
        learning_rate: args.learning_rate,
        save_every: args.save_every,
        out_dir: args.out,
        seed: args.seed,
        ..TrainConfig::default()
    };
    let mut trainer = Trainer::new(config)?;
    let summary = trainer.run()?;
    for (seat, stats) in summary.stats.iter().enumerate() {
        println!(
            "agent {} | hands {} | decisions {} | raw return {:+.1} | shaped return {:+.3}",
            seat, stats.hands, stats.decisions, stats.raw_return, stats.shaped_return,
        );
    }
    Ok(())
}
