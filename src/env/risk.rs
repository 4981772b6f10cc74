use crate::Utility;
use crate::RISK_SCALE;
use serde::Deserialize;
use serde::Serialize;

/// Reward shaping applied to an agent's terminal chip payoff before it
/// enters the learning update. All three are odd and strictly
/// increasing; they differ only in how hard they lean on magnitude.
/// The transform never touches the chips the engine actually moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    /// identity; the control group
    Neutral,
    /// sign(x) * ln(1 + |x|): compresses swings, punishes variance
    Averse,
    /// sign(x) * x^2 / k: amplifies swings, rewards variance
    Seeking,
}

impl RiskProfile {
    pub const ALL: [Self; 3] = [Self::Neutral, Self::Averse, Self::Seeking];

    pub fn transform(&self, x: Utility) -> Utility {
        match self {
            Self::Neutral => x,
            Self::Averse => x.signum() * x.abs().ln_1p(),
            Self::Seeking => x.signum() * x * x / RISK_SCALE,
        }
    }
}

impl std::fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Neutral => write!(f, "neutral"),
            Self::Averse => write!(f, "averse"),
            Self::Seeking => write!(f, "seeking"),
        }
    }
}
