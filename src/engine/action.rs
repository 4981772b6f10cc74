use crate::Chips;
use colored::Colorize;

pub const N_ACTIONS: usize = 4;

/// What a seat may do when the action is on it. Raise names the
/// street total the actor raises *to*, not the increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fold,
    Check,
    Call,
    Raise(Chips),
}

impl Action {
    /// position of this action's logit in the policy head
    pub fn index(&self) -> usize {
        match self {
            Action::Fold => 0,
            Action::Check => 1,
            Action::Call => 2,
            Action::Raise(_) => 3,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Fold => write!(f, "{}", "FOLD ".red()),
            Action::Check => write!(f, "{}", "CHECK".cyan()),
            Action::Call => write!(f, "{}", "CALL ".yellow()),
            Action::Raise(to) => write!(f, "{}", format!("RAISE {}", to).green()),
        }
    }
}
