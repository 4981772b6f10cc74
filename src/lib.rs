pub mod cards;
pub mod encode;
pub mod engine;
pub mod env;
pub mod net;
pub mod train;

pub type Chips = u32;
pub type Utility = f32;
pub type Probability = f32;

/// widest table the fixed-width state encoding supports
pub const MAX_SEATS: usize = 6;
/// default starting stack for every seat
pub const STACK: Chips = 100;
pub const S_BLIND: Chips = 1;
pub const B_BLIND: Chips = 2;
/// scaling constant k in the risk-seeking transform sign(x) * x^2 / k
pub const RISK_SCALE: Utility = 100.0;

/// Errors surfaced by the library. Structural invariant violations
/// (chip conservation) are panics, not variants; see [engine::Engine].
#[derive(thiserror::Error, Debug)]
pub enum GymError {
    #[error("illegal action {action} by seat {seat}")]
    IllegalAction { seat: usize, action: String },
    #[error("hand is already complete")]
    HandOver,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
