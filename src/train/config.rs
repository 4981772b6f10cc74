use crate::Chips;
use crate::GymError;
use crate::B_BLIND;
use crate::MAX_SEATS;
use crate::STACK;
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a training run needs up front. Owned by the Trainer, so
/// independent runs with independent configs can coexist in-process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// hands to play; one episode is one hand
    pub episodes: usize,
    /// seats at the table, one agent per seat
    pub players: usize,
    /// starting stack restored to every seat each hand
    pub stack: Chips,
    /// width of the two shared hidden layers
    pub hidden_dim: usize,
    /// AdamW learning rate
    pub learning_rate: f64,
    /// global L2 gradient clipping threshold
    pub grad_clip_norm: f64,
    /// checkpoint cadence in episodes
    pub save_every: usize,
    /// where checkpoints and the manifest land
    pub out_dir: PathBuf,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            players: 3,
            stack: STACK,
            hidden_dim: 128,
            learning_rate: 1e-3,
            grad_clip_norm: 1.0,
            save_every: 1_000,
            out_dir: PathBuf::from("checkpoints"),
            seed: 42,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), GymError> {
        if self.episodes == 0 {
            return Err(GymError::Config("episodes must be > 0".into()));
        }
        if !(2..=MAX_SEATS).contains(&self.players) {
            return Err(GymError::Config(format!(
                "players must be in 2..={}",
                MAX_SEATS
            )));
        }
        if self.stack < B_BLIND {
            return Err(GymError::Config("stack cannot cover the big blind".into()));
        }
        if self.hidden_dim == 0 {
            return Err(GymError::Config("hidden_dim must be > 0".into()));
        }
        if self.learning_rate <= 0.0 {
            return Err(GymError::Config("learning_rate must be > 0".into()));
        }
        if self.save_every == 0 {
            return Err(GymError::Config("save_every must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        TrainConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_player_counts() {
        let config = TrainConfig {
            players: 1,
            ..TrainConfig::default()
        };
        assert!(config.validate().is_err());
        let config = TrainConfig {
            players: MAX_SEATS + 1,
            ..TrainConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_episodes() {
        let config = TrainConfig {
            episodes: 0,
            ..TrainConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
