use super::seat::Seat;
use super::seat::Status;
use crate::Chips;

/// One layer of the pot: an amount and a bitmask of the seats that may
/// win it. The main pot is the first layer; side pots follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: u16,
}

impl Pot {
    pub fn is_eligible(&self, seat: usize) -> bool {
        self.eligible & (1 << seat) != 0
    }
}

/// Rebuild the full pot structure from per-seat contributions in one
/// linear pass. Tier boundaries are the distinct all-in contribution
/// levels (plus the table maximum); each layer takes the incremental
/// contribution of every seat that reached its cap, and is winnable by
/// the in-hand seats among them. Folded chips fill layers but confer
/// no eligibility, so every contributed chip lands in exactly one pot.
pub fn layered(seats: &[Seat]) -> Vec<Pot> {
    let mut caps = seats
        .iter()
        .filter(|s| s.status() == Status::AllIn)
        .map(|s| s.spent())
        .collect::<Vec<Chips>>();
    caps.push(seats.iter().map(|s| s.spent()).max().unwrap_or(0));
    caps.sort_unstable();
    caps.dedup();
    let mut pots = Vec::new();
    let mut floor = 0;
    for cap in caps {
        if cap == floor {
            continue;
        }
        let amount = seats
            .iter()
            .map(|s| s.spent().min(cap) - s.spent().min(floor))
            .sum::<Chips>();
        let eligible = seats
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_in_hand() && s.spent() >= cap)
            .fold(0u16, |mask, (i, _)| mask | 1 << i);
        if amount > 0 {
            pots.push(Pot { amount, eligible });
        }
        floor = cap;
    }
    pots
}
