use crate::cards::Card;
use crate::Chips;
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Active,
    Folded,
    AllIn,
    Eliminated,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "A"),
            Status::Folded => write!(f, "{}", "F".red()),
            Status::AllIn => write!(f, "{}", "S".magenta()),
            Status::Eliminated => write!(f, "{}", "X".dimmed()),
        }
    }
}

/// One position at the table. Only the Engine mutates a Seat, and only
/// through bet/refund/win so every chip movement is paired with the
/// spent counter the pot layering is derived from.
#[derive(Debug, Clone)]
pub struct Seat {
    stack: Chips,
    stake: Chips,
    spent: Chips,
    hole: Option<[Card; 2]>,
    status: Status,
}

impl Seat {
    pub fn new(stack: Chips) -> Self {
        Self {
            stack,
            stake: 0,
            spent: 0,
            hole: None,
            status: if stack == 0 {
                Status::Eliminated
            } else {
                Status::Active
            },
        }
    }

    pub fn stack(&self) -> Chips {
        self.stack
    }
    /// committed this street
    pub fn stake(&self) -> Chips {
        self.stake
    }
    /// committed this hand
    pub fn spent(&self) -> Chips {
        self.spent
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn hole(&self) -> Option<[Card; 2]> {
        self.hole
    }

    /// dealt in and not yet folded
    pub fn is_in_hand(&self) -> bool {
        matches!(self.status, Status::Active | Status::AllIn)
    }
    /// still owed betting decisions
    pub fn can_act(&self) -> bool {
        self.status == Status::Active
    }

    //

    pub fn deal(&mut self, hole: [Card; 2]) {
        self.hole = Some(hole);
    }
    pub fn bet(&mut self, amount: Chips) {
        assert!(amount <= self.stack, "bet exceeds stack");
        self.stack -= amount;
        self.stake += amount;
        self.spent += amount;
        if self.stack == 0 {
            self.status = Status::AllIn;
        }
    }
    /// return uncalled chips; never resurrects an all-in seat
    pub fn refund(&mut self, amount: Chips) {
        assert!(amount <= self.spent, "refund exceeds contribution");
        self.stack += amount;
        self.stake = self.stake.saturating_sub(amount);
        self.spent -= amount;
    }
    pub fn win(&mut self, amount: Chips) {
        self.stack += amount;
    }
    pub fn fold(&mut self) {
        self.status = Status::Folded;
    }
    pub fn clear_stake(&mut self) {
        self.stake = 0;
    }
    /// pots have been distributed; contributions are consumed
    pub fn clear_spent(&mut self) {
        self.spent = 0;
    }
    pub fn reset(&mut self, stack: Chips) {
        *self = Self::new(stack);
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{:>6}", self.status, self.stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn betting_moves_chips_and_flags_all_in() {
        let mut seat = Seat::new(10);
        seat.bet(4);
        assert_eq!((seat.stack(), seat.stake(), seat.spent()), (6, 4, 4));
        assert_eq!(seat.status(), Status::Active);
        seat.bet(6);
        assert_eq!(seat.status(), Status::AllIn);
        assert!(!seat.can_act());
        assert!(seat.is_in_hand());
    }

    #[test]
    fn zero_stack_is_eliminated() {
        let seat = Seat::new(0);
        assert_eq!(seat.status(), Status::Eliminated);
        assert!(!seat.is_in_hand());
    }

    #[test]
    fn refund_restores_stack() {
        let mut seat = Seat::new(50);
        seat.bet(30);
        seat.refund(10);
        assert_eq!((seat.stack(), seat.spent()), (30, 20));
    }
}
