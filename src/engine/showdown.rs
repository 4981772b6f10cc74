use super::pot::Pot;
use super::seat::Seat;
use crate::cards::Card;
use crate::cards::Hand;
use crate::cards::Strength;
use crate::Chips;

/// Resolve every pot layer independently and return the chips awarded
/// to each seat. Ties split evenly; remainder chips go one apiece to
/// the tied winners in ascending seat order. A layer with no eligible
/// contender is a pot construction bug and panics.
pub fn settle(seats: &[Seat], pots: &[Pot], board: &[Card]) -> Vec<Chips> {
    let strengths = seats
        .iter()
        .map(|seat| match (seat.is_in_hand(), seat.hole()) {
            (true, Some(hole)) => Some(strength(hole, board)),
            _ => None,
        })
        .collect::<Vec<Option<Strength>>>();
    let mut rewards = vec![0; seats.len()];
    for pot in pots {
        let best = strengths
            .iter()
            .enumerate()
            .filter(|(i, _)| pot.is_eligible(*i))
            .filter_map(|(_, s)| *s)
            .max()
            .expect("pot layer with no eligible contender");
        let winners = strengths
            .iter()
            .enumerate()
            .filter(|(i, s)| pot.is_eligible(*i) && **s == Some(best))
            .map(|(i, _)| i)
            .collect::<Vec<usize>>();
        let share = pot.amount / winners.len() as Chips;
        let remainder = pot.amount as usize % winners.len();
        for (nth, winner) in winners.into_iter().enumerate() {
            rewards[winner] += share + if nth < remainder { 1 } else { 0 };
        }
    }
    rewards
}

fn strength(hole: [Card; 2], board: &[Card]) -> Strength {
    let hand = board
        .iter()
        .copied()
        .chain(hole)
        .collect::<Hand>();
    Strength::from(hand)
}
