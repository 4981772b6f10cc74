use super::agent::AgentProfile;
use super::config::TrainConfig;
use super::trajectory::Sample;
use super::trajectory::Trajectory;
use crate::env::HoldemEnv;
use crate::env::RiskProfile;
use crate::GymError;
use crate::Utility;
use candle_core::Device;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Per-agent running totals, logged on the checkpoint cadence.
#[derive(Debug, Default, Clone)]
pub struct AgentStats {
    pub hands: usize,
    pub decisions: usize,
    pub raw_return: f64,
    pub shaped_return: f64,
}

pub struct Summary {
    pub episodes: usize,
    pub stats: Vec<AgentStats>,
}

#[derive(Serialize)]
struct Manifest {
    episodes: usize,
    seed: u64,
    agents: Vec<ManifestAgent>,
}

#[derive(Serialize)]
struct ManifestAgent {
    id: usize,
    risk: RiskProfile,
    file: String,
}

/// Runs the whole training loop: one environment, one agent per seat,
/// risk profiles handed out round-robin at construction. Every piece
/// of mutable training state lives in this struct, so independent
/// trainers can run side by side.
pub struct Trainer {
    config: TrainConfig,
    env: HoldemEnv,
    agents: Vec<AgentProfile>,
    stats: Vec<AgentStats>,
    device: Device,
    rng: StdRng,
    episodes_run: usize,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Result<Self, GymError> {
        config.validate()?;
        let device = Device::Cpu;
        let stacks = vec![config.stack; config.players];
        let env = HoldemEnv::new(&stacks, config.seed);
        let agents = (0..config.players)
            .map(|seat| {
                AgentProfile::new(
                    seat,
                    RiskProfile::ALL[seat % RiskProfile::ALL.len()],
                    config.hidden_dim,
                    config.learning_rate,
                    &device,
                )
            })
            .collect::<Result<Vec<AgentProfile>, GymError>>()?;
        let rng = StdRng::seed_from_u64(config.seed.wrapping_mul(0x9E3779B97F4A7C15));
        let stats = vec![AgentStats::default(); config.players];
        Ok(Self {
            config,
            env,
            agents,
            stats,
            device,
            rng,
            episodes_run: 0,
        })
    }

    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }
    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// play all configured episodes, updating and checkpointing as we go
    pub fn run(&mut self) -> Result<Summary, GymError> {
        log::info!(
            "training {} agents for {} episodes",
            self.config.players,
            self.config.episodes,
        );
        for agent in self.agents.iter() {
            log::info!("agent {} plays {}", agent.id(), agent.risk());
        }
        for _ in 0..self.config.episodes {
            self.episode()?;
            if self.episodes_run % self.config.save_every == 0 {
                self.checkpoint()?;
                self.log_progress();
            }
        }
        self.checkpoint()?;
        self.log_progress();
        Ok(Summary {
            episodes: self.episodes_run,
            stats: self.stats.clone(),
        })
    }

    /// One episode is one hand: roll the table forward one decision at
    /// a time, each seat thinking with its own network over its own
    /// encoded view, then settle every agent's REINFORCE update from
    /// its transformed terminal payoff. Returns the raw chip deltas.
    pub fn episode(&mut self) -> Result<Vec<i64>, GymError> {
        self.env.reset();
        let mut trajectories = (0..self.config.players)
            .map(|_| Trajectory::new())
            .collect::<Vec<Trajectory>>();
        while !self.env.is_done() {
            let seat = self.env.current();
            let state = self.env.observe(seat);
            let kind_mask = self.env.kind_mask();
            let bucket_mask = self.env.bucket_mask();
            let decision = self.agents[seat].net().decide(
                &state,
                &kind_mask,
                &bucket_mask,
                &self.device,
                &mut self.rng,
            )?;
            let action = if decision.fallback {
                self.env.fold_or_check()
            } else {
                self.env.to_action(decision.kind, decision.bucket)
            };
            debug_assert!(
                self.env.engine().is_allowed(&action),
                "sampled an illegal action: {}",
                action,
            );
            if !decision.fallback {
                trajectories[seat].push(Sample {
                    state,
                    kind: decision.kind,
                    bucket: decision.bucket,
                    logp: decision.logp,
                    value: decision.value,
                    kind_mask,
                    bucket_mask,
                });
            }
            self.env.step(action)?;
        }

        let payoffs = self.env.payoffs();
        let clip = self.config.grad_clip_norm;
        for (seat, trajectory) in trajectories.iter().enumerate() {
            let raw = payoffs[seat] as Utility;
            let shaped = self.agents[seat].risk().transform(raw);
            let loss = self.agents[seat].update(trajectory, shaped, clip, &self.device)?;
            let stats = &mut self.stats[seat];
            stats.hands += 1;
            stats.decisions += trajectory.len();
            stats.raw_return += f64::from(raw);
            stats.shaped_return += f64::from(shaped);
            log::debug!(
                "episode {} seat {} raw {:+} shaped {:+.3} loss {:+.4}",
                self.episodes_run,
                seat,
                raw,
                shaped,
                loss,
            );
        }
        self.episodes_run += 1;
        Ok(payoffs)
    }

    /// write every agent's parameters plus a manifest describing them
    pub fn checkpoint(&self) -> Result<(), GymError> {
        for agent in self.agents.iter() {
            agent.save(&self.config.out_dir)?;
        }
        let manifest = Manifest {
            episodes: self.episodes_run,
            seed: self.config.seed,
            agents: self
                .agents
                .iter()
                .map(|agent| ManifestAgent {
                    id: agent.id(),
                    risk: agent.risk(),
                    file: agent.file_name(),
                })
                .collect(),
        };
        let path = self.config.out_dir.join("manifest.json");
        std::fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
        log::info!(
            "checkpointed {} agents at episode {}",
            self.agents.len(),
            self.episodes_run,
        );
        Ok(())
    }

    fn log_progress(&self) {
        for (seat, stats) in self.stats.iter().enumerate() {
            log::info!(
                "agent {} ({}) | hands {:>6} decisions {:>7} raw {:+10.1} shaped {:+10.3}",
                seat,
                self.agents[seat].risk(),
                stats.hands,
                stats.decisions,
                stats.raw_return,
                stats.shaped_return,
            );
        }
    }
}
