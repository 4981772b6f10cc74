use super::action::Action;
use super::action::N_ACTIONS;
use super::phase::Phase;
use super::pot;
use super::pot::Pot;
use super::seat::Seat;
use super::showdown;
use crate::cards::Card;
use crate::cards::Deck;
use crate::Chips;
use crate::GymError;
use crate::B_BLIND;
use crate::MAX_SEATS;
use crate::S_BLIND;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// One full hand of No-Limit Hold-Em as a forward-only state machine.
///
/// The Engine exclusively owns all mutable hand state: deck, board,
/// seats, pot structure, and the betting bookkeeping. reset() starts a
/// fresh hand from the configured stacks; step() applies one validated
/// action and advances phases until the hand is Done. Side pots are
/// recomputed from contributions after every action, and chip
/// conservation is asserted after every mutation; a violation is a
/// structural bug and panics rather than returning an error.
pub struct Engine {
    seats: Vec<Seat>,
    starting: Vec<Chips>,
    board: Vec<Card>,
    deck: Deck,
    phase: Phase,
    button: usize,
    actor: usize,
    bet: Chips,
    min_raise: Chips,
    pending: u16,
    total: Chips,
    rng: StdRng,
}

impl Engine {
    pub fn new(stacks: &[Chips], seed: u64) -> Self {
        assert!(
            (2..=MAX_SEATS).contains(&stacks.len()),
            "player count out of range"
        );
        assert!(
            stacks.iter().filter(|s| **s > 0).count() >= 2,
            "need two funded seats"
        );
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            seats: stacks.iter().map(|s| Seat::new(*s)).collect(),
            starting: stacks.to_vec(),
            board: Vec::with_capacity(5),
            deck: Deck::shuffled(&mut rng),
            phase: Phase::Done,
            button: stacks.len() - 1,
            actor: 0,
            bet: 0,
            min_raise: B_BLIND,
            pending: 0,
            total: stacks.iter().sum(),
            rng,
        }
    }

    /// shuffle, post blinds, deal holes, hand the action to the first
    /// seat after the big blind
    pub fn reset(&mut self) {
        self.deck = Deck::shuffled(&mut self.rng);
        self.board.clear();
        for (seat, stack) in self.seats.iter_mut().zip(self.starting.clone()) {
            seat.reset(stack);
        }
        self.phase = Phase::Preflop;
        self.bet = 0;
        self.min_raise = B_BLIND;
        self.button = self.next_in_hand(self.button);
        for seat in self.seats.iter_mut().filter(|s| s.is_in_hand()) {
            seat.deal(self.deck.hole());
        }
        let (sb, bb) = self.blinds();
        self.post(sb, S_BLIND);
        self.post(bb, B_BLIND);
        self.bet = B_BLIND;
        self.pending = self.active_mask();
        self.assert_conserved();
        if self.pending == 0 {
            // blinds already put everyone all-in
            self.advance_phase();
        } else {
            self.actor = self.next_pending(bb);
        }
    }

    /// apply one action for the seat currently to act
    pub fn step(&mut self, action: Action) -> Result<(), GymError> {
        if !self.phase.is_betting() {
            return Err(GymError::HandOver);
        }
        if !self.is_allowed(&action) {
            return Err(GymError::IllegalAction {
                seat: self.actor,
                action: action.to_string(),
            });
        }
        let actor = self.actor;
        match action {
            Action::Fold => self.seats[actor].fold(),
            Action::Check => {}
            Action::Call => {
                let owed = self.to_call(actor).min(self.seats[actor].stack());
                self.seats[actor].bet(owed);
            }
            Action::Raise(to) => {
                let add = to - self.seats[actor].stake();
                if to - self.bet >= self.min_raise {
                    self.min_raise = to - self.bet;
                }
                self.bet = to;
                self.seats[actor].bet(add);
                self.pending = self.active_mask();
            }
        }
        self.pending &= !(1 << actor);
        self.pending &= self.active_mask();
        self.assert_conserved();
        log::trace!("seat {} {} | {}", actor, action, self);
        if self.in_hand() == 1 {
            self.refund_uncalled();
            self.distribute();
        } else if self.pending == 0 {
            self.advance_phase();
        } else {
            self.actor = self.next_pending(actor);
        }
        Ok(())
    }

    //

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn n(&self) -> usize {
        self.seats.len()
    }
    /// seat currently to act; meaningless once the hand is Done
    pub fn actor(&self) -> usize {
        self.actor
    }
    pub fn bet(&self) -> Chips {
        self.bet
    }
    /// every chip contributed and not yet distributed or refunded
    pub fn pot(&self) -> Chips {
        self.seats.iter().map(|s| s.spent()).sum()
    }
    /// current pot layering, main pot first
    pub fn pots(&self) -> Vec<Pot> {
        pot::layered(&self.seats)
    }
    pub fn to_call(&self, seat: usize) -> Chips {
        self.bet.saturating_sub(self.seats[seat].stake())
    }
    /// smallest legal full-raise target
    pub fn min_raise_to(&self) -> Chips {
        self.bet + self.min_raise
    }
    /// street total if the seat shoves its whole stack
    pub fn all_in_to(&self, seat: usize) -> Chips {
        self.seats[seat].stake() + self.seats[seat].stack()
    }

    /// legality of {fold, check, call, raise} for the seat to act
    pub fn kind_mask(&self) -> [bool; N_ACTIONS] {
        if !self.phase.is_betting() {
            return [false; N_ACTIONS];
        }
        let owed = self.to_call(self.actor);
        let stack = self.seats[self.actor].stack();
        [owed > 0, owed == 0, owed > 0, stack > owed]
    }

    pub fn legal_actions(&self, seat: usize) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.phase.is_betting() || seat != self.actor {
            return actions;
        }
        let mask = self.kind_mask();
        if mask[0] {
            actions.push(Action::Fold);
        }
        if mask[1] {
            actions.push(Action::Check);
        }
        if mask[2] {
            actions.push(Action::Call);
        }
        if mask[3] {
            actions.push(Action::Raise(self.min_raise_to().min(self.all_in_to(seat))));
        }
        actions
    }

    pub fn is_allowed(&self, action: &Action) -> bool {
        if !self.phase.is_betting() {
            return false;
        }
        let mask = self.kind_mask();
        match action {
            Action::Fold => mask[0],
            Action::Check => mask[1],
            Action::Call => mask[2],
            Action::Raise(to) => {
                let all_in = self.all_in_to(self.actor);
                mask[3]
                    && *to > self.bet
                    && *to <= all_in
                    && (*to >= self.min_raise_to() || *to == all_in)
            }
        }
    }

    /// net chip result per seat; valid once the hand is Done
    pub fn payoffs(&self) -> Vec<i64> {
        assert!(self.is_done(), "payoffs before hand completion");
        self.seats
            .iter()
            .zip(self.starting.iter())
            .map(|(seat, start)| seat.stack() as i64 - *start as i64)
            .collect()
    }

    //

    fn blinds(&self) -> (usize, usize) {
        if self.in_hand() == 2 {
            // heads-up: the button posts the small blind
            (self.button, self.next_in_hand(self.button))
        } else {
            let sb = self.next_in_hand(self.button);
            (sb, self.next_in_hand(sb))
        }
    }
    fn post(&mut self, seat: usize, blind: Chips) {
        let amount = blind.min(self.seats[seat].stack());
        self.seats[seat].bet(amount);
    }

    /// betting on this street is settled: refund any uncalled excess,
    /// then reveal the next street, or run the board out if fewer than
    /// two seats can still bet, and finally resolve the showdown
    fn advance_phase(&mut self) {
        self.refund_uncalled();
        loop {
            match self.phase {
                Phase::Preflop => {
                    self.reveal(3);
                    self.phase = Phase::Flop;
                }
                Phase::Flop => {
                    self.reveal(1);
                    self.phase = Phase::Turn;
                }
                Phase::Turn => {
                    self.reveal(1);
                    self.phase = Phase::River;
                }
                Phase::River => {
                    self.phase = Phase::Showdown;
                    return self.distribute();
                }
                _ => unreachable!("advance from terminal phase"),
            }
            for seat in self.seats.iter_mut() {
                seat.clear_stake();
            }
            self.bet = 0;
            self.min_raise = B_BLIND;
            if self.actives() >= 2 {
                self.pending = self.active_mask();
                self.actor = self.next_pending(self.button);
                return;
            }
        }
    }

    /// the lone deepest contributor takes back whatever nobody matched
    fn refund_uncalled(&mut self) {
        let top = self.seats.iter().map(|s| s.spent()).max().unwrap_or(0);
        if top == 0 {
            return;
        }
        let leaders = self
            .seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.spent() == top)
            .map(|(i, _)| i)
            .collect::<Vec<usize>>();
        if let [leader] = leaders[..] {
            let matched = self
                .seats
                .iter()
                .map(|s| s.spent())
                .filter(|s| *s < top)
                .max()
                .unwrap_or(0);
            self.seats[leader].refund(top - matched);
            self.assert_conserved();
        }
    }

    /// evaluate the pot layering once and move every chip home
    fn distribute(&mut self) {
        let pots = pot::layered(&self.seats);
        let rewards = showdown::settle(&self.seats, &pots, &self.board);
        for (seat, chips) in self.seats.iter_mut().zip(rewards) {
            seat.win(chips);
            seat.clear_stake();
            seat.clear_spent();
        }
        self.phase = Phase::Done;
        self.pending = 0;
        self.assert_conserved();
        log::trace!("hand complete | {}", self);
    }

    fn reveal(&mut self, n: usize) {
        for _ in 0..n {
            self.board.push(self.deck.draw());
        }
    }

    fn in_hand(&self) -> usize {
        self.seats.iter().filter(|s| s.is_in_hand()).count()
    }
    fn actives(&self) -> usize {
        self.seats.iter().filter(|s| s.can_act()).count()
    }
    fn active_mask(&self) -> u16 {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.can_act())
            .fold(0u16, |mask, (i, _)| mask | 1 << i)
    }
    fn next_in_hand(&self, from: usize) -> usize {
        (1..=self.n())
            .map(|k| (from + k) % self.n())
            .find(|i| self.seats[*i].is_in_hand())
            .expect("at least one seat in hand")
    }
    fn next_pending(&self, from: usize) -> usize {
        (1..=self.n())
            .map(|k| (from + k) % self.n())
            .find(|i| self.pending & (1 << i) != 0)
            .expect("no seat owes a decision")
    }

    /// every chip is either in a stack or in a pot, at every instant
    fn assert_conserved(&self) {
        let held = self.seats.iter().map(|s| s.stack()).sum::<Chips>();
        let potted = self.pots().iter().map(|p| p.amount).sum::<Chips>();
        assert!(
            held + potted == self.total,
            "chip conservation violated: {} in stacks + {} in pots != {}",
            held,
            potted,
            self.total,
        );
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for seat in self.seats.iter() {
            write!(f, "{} ", seat)?;
        }
        write!(f, "@ {:>5} ", self.pot())?;
        for card in self.board.iter() {
            write!(f, "{} ", card)?;
        }
        write!(f, "({})", self.phase)
    }
}
